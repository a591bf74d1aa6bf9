//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the credential hasher and the image store.

pub mod account;
pub mod auth;
pub mod blog_post;
pub mod meal_plan;
pub mod uploads;

pub use account::AccountService;
pub use auth::AuthService;
pub use blog_post::BlogPostService;
pub use meal_plan::{ImageUpload, MealPlanService};
pub use uploads::{is_image, ImageStore};
