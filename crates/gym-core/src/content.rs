//! Gallery items, posts, and the homepage feed built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
  Image,
  Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
  pub id:               Uuid,
  pub title:            String,
  pub description:      Option<String>,
  pub media_type:       MediaType,
  pub url:              String,
  /// Free-form, e.g. "Events", "Workout Sessions", "Transformations".
  pub category:         String,
  pub created_at:       DateTime<Utc>,
  /// Thumbnail shown in grids.
  pub image:            String,
  /// Short alt-text style hint.
  pub hint:             Option<String>,
  #[serde(default)]
  pub show_on_homepage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGalleryItem {
  pub title:            String,
  pub description:      Option<String>,
  pub media_type:       MediaType,
  pub url:              String,
  pub category:         String,
  pub image:            String,
  pub hint:             Option<String>,
  #[serde(default)]
  pub show_on_homepage: bool,
}

impl GalleryItem {
  pub fn from_new(id: Uuid, input: NewGalleryItem, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      title: input.title,
      description: input.description,
      media_type: input.media_type,
      url: input.url,
      category: input.category,
      created_at,
      image: input.image,
      hint: input.hint,
      show_on_homepage: input.show_on_homepage,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:               Uuid,
  pub title:            String,
  pub content:          String,
  pub image_url:        Option<String>,
  pub created_at:       DateTime<Utc>,
  /// External link the post card points to, if any.
  pub redirect_url:     Option<String>,
  #[serde(default)]
  pub show_on_homepage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
  pub title:            String,
  pub content:          String,
  pub image_url:        Option<String>,
  pub redirect_url:     Option<String>,
  #[serde(default)]
  pub show_on_homepage: bool,
}

impl Post {
  pub fn from_new(id: Uuid, input: NewPost, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      title: input.title,
      content: input.content,
      image_url: input.image_url,
      created_at,
      redirect_url: input.redirect_url,
      show_on_homepage: input.show_on_homepage,
    }
  }
}

// ─── Homepage feed ───────────────────────────────────────────────────────────

/// A post or gallery item promoted to the homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum FeaturedItem {
  Post(Post),
  Gallery(GalleryItem),
}

impl FeaturedItem {
  pub fn created_at(&self) -> DateTime<Utc> {
    match self {
      Self::Post(p) => p.created_at,
      Self::Gallery(g) => g.created_at,
    }
  }
}

/// Posts and gallery items flagged for the homepage, newest first.
pub fn featured_items(posts: &[Post], gallery: &[GalleryItem]) -> Vec<FeaturedItem> {
  let mut items: Vec<_> = posts
    .iter()
    .filter(|p| p.show_on_homepage)
    .cloned()
    .map(FeaturedItem::Post)
    .chain(
      gallery
        .iter()
        .filter(|g| g.show_on_homepage)
        .cloned()
        .map(FeaturedItem::Gallery),
    )
    .collect();
  items.sort_by_key(|i| std::cmp::Reverse(i.created_at()));
  items
}

/// Pseudo-category that matches every gallery item.
pub const ALL_CATEGORIES: &str = "All";

/// `"All"` followed by each distinct category in order of first appearance.
pub fn gallery_categories(gallery: &[GalleryItem]) -> Vec<String> {
  let mut categories = vec![ALL_CATEGORIES.to_owned()];
  for item in gallery {
    if !categories.contains(&item.category) {
      categories.push(item.category.clone());
    }
  }
  categories
}

/// Items in `category`; `"All"` keeps everything.
pub fn filter_by_category<'a>(
  gallery: &'a [GalleryItem],
  category: &str,
) -> Vec<&'a GalleryItem> {
  gallery
    .iter()
    .filter(|g| category == ALL_CATEGORIES || g.category == category)
    .collect()
}
