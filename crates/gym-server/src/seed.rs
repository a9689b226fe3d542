//! Sample data for a fresh store (`gym-server --seed`).
//!
//! Each collection is filled only if it is empty, so seeding an existing
//! installation never duplicates or overwrites anything.

use chrono::NaiveDate;
use gym_core::{
  clock::Clock,
  content::{MediaType, NewGalleryItem, NewPost},
  income::NewExpense,
  ledger,
  member::{Gender, Member, NewMember, Payment},
  month::YearMonth,
  store::GymStore,
};
use rust_decimal::Decimal;

/// How many documents were inserted into each collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub members:  usize,
  pub gallery:  usize,
  pub posts:    usize,
  pub expenses: usize,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

struct SampleMember {
  input: NewMember,
  /// Payment dates; each pays for the month it falls in.
  paid:  Vec<NaiveDate>,
}

fn sample_members() -> Vec<SampleMember> {
  vec![
    SampleMember {
      input: NewMember {
        full_name:        "John Doe".into(),
        dob:              ymd(1990, 5, 15),
        gender:           Gender::Male,
        phone:            "+1234567890".into(),
        email:            Some("john.doe@email.com".into()),
        blood_group:      "O+".into(),
        admission_fee:    Decimal::from(1000),
        monthly_fee:      Decimal::from(500),
        start_date:       ymd(2024, 1, 15),
        notes:            Some("Regular member, very dedicated".into()),
        photo_url:        None,
        show_on_homepage: true,
      },
      paid:  vec![ymd(2024, 1, 15), ymd(2024, 2, 15)],
    },
    SampleMember {
      input: NewMember {
        full_name:        "Jane Smith".into(),
        dob:              ymd(1988, 12, 20),
        gender:           Gender::Female,
        phone:            "+1234567891".into(),
        email:            Some("jane.smith@email.com".into()),
        blood_group:      "A+".into(),
        admission_fee:    Decimal::from(1000),
        monthly_fee:      Decimal::from(500),
        start_date:       ymd(2024, 2, 1),
        notes:            Some("New member, showing great progress".into()),
        photo_url:        None,
        show_on_homepage: false,
      },
      paid:  vec![ymd(2024, 2, 1)],
    },
  ]
}

fn sample_gallery() -> Vec<NewGalleryItem> {
  vec![
    NewGalleryItem {
      title:            "Morning Workout Session".into(),
      description:      Some("Members enjoying their morning workout routine".into()),
      media_type:       MediaType::Image,
      url:              "/images/morning-workout.jpg".into(),
      category:         "Workout Sessions".into(),
      image:            "/images/morning-workout.jpg".into(),
      hint:             Some("High energy morning session".into()),
      show_on_homepage: true,
    },
    NewGalleryItem {
      title:            "Fitness Transformation".into(),
      description:      Some("Amazing transformation journey of our member".into()),
      media_type:       MediaType::Image,
      url:              "/images/transformation.jpg".into(),
      category:         "Transformations".into(),
      image:            "/images/transformation.jpg".into(),
      hint:             Some("Before and after results".into()),
      show_on_homepage: true,
    },
    NewGalleryItem {
      title:            "Gym Anniversary Event".into(),
      description:      Some("Celebrating our gym anniversary with members".into()),
      media_type:       MediaType::Video,
      url:              "/videos/anniversary-event.mp4".into(),
      category:         "Events".into(),
      image:            "/images/anniversary-thumbnail.jpg".into(),
      hint:             Some("Special celebration event".into()),
      show_on_homepage: true,
    },
  ]
}

fn sample_posts() -> Vec<NewPost> {
  vec![
    NewPost {
      title:            "Welcome to Gymnasium Zenith".into(),
      content:          "Welcome to our gym. We offer modern equipment and training \
                         programs to help you reach your fitness goals."
        .into(),
      image_url:        Some("/images/gym-interior.jpg".into()),
      redirect_url:     Some("/about".into()),
      show_on_homepage: true,
    },
    NewPost {
      title:            "New Equipment Arrival".into(),
      content:          "New equipment has arrived. Come and try the latest additions!".into(),
      image_url:        Some("/images/new-equipment.jpg".into()),
      redirect_url:     Some("/gallery".into()),
      show_on_homepage: true,
    },
    NewPost {
      title:            "Monthly Fitness Challenge".into(),
      content:          "Join the monthly fitness challenge and win prizes.".into(),
      image_url:        Some("/images/fitness-challenge.jpg".into()),
      redirect_url:     Some("/challenges".into()),
      show_on_homepage: false,
    },
  ]
}

fn sample_expenses() -> Vec<NewExpense> {
  [
    ("Equipment Maintenance", 2500, ymd(2024, 1, 15)),
    ("Utility Bills", 800, ymd(2024, 1, 20)),
    ("Cleaning Supplies", 300, ymd(2024, 1, 25)),
    ("Staff Training", 1500, ymd(2024, 2, 1)),
  ]
  .into_iter()
  .map(|(description, amount, date)| NewExpense {
    description: description.into(),
    amount: Decimal::from(amount),
    date,
  })
  .collect()
}

/// Mark the month containing `paid_on` as paid. Months after `today` are not
/// in the ledger yet and are skipped.
fn pay_sample(member: &mut Member, paid_on: NaiveDate, today: NaiveDate) -> gym_core::Result<()> {
  let month = YearMonth::containing(paid_on);
  if month > YearMonth::containing(today) {
    tracing::debug!(%month, "sample payment after today skipped");
    return Ok(());
  }
  let id = Payment::default_id(member.id, month);
  ledger::mark_as_paid(&mut member.payments, &id, paid_on)?;
  Ok(())
}

/// Insert the sample documents into every empty collection.
pub async fn seed<S>(store: &S, clock: &dyn Clock) -> Result<SeedReport, S::Error>
where
  S: GymStore,
  S::Error: From<gym_core::Error>,
{
  let mut report = SeedReport::default();
  let today = clock.today();

  if store.list_members().await?.is_empty() {
    for sample in sample_members() {
      let mut member = store.add_member(sample.input).await?;
      member.refresh(today);
      for paid_on in sample.paid {
        pay_sample(&mut member, paid_on, today)?;
      }
      store.save_member(&member).await?;
      report.members += 1;
    }
  }

  if store.list_gallery_items().await?.is_empty() {
    for item in sample_gallery() {
      store.add_gallery_item(item).await?;
      report.gallery += 1;
    }
  }

  if store.list_posts().await?.is_empty() {
    for post in sample_posts() {
      store.add_post(post).await?;
      report.posts += 1;
    }
  }

  if store.list_expenses().await?.is_empty() {
    for expense in sample_expenses() {
      store.add_expense(expense).await?;
      report.expenses += 1;
    }
  }

  tracing::info!(?report, "sample data inserted");
  Ok(report)
}
