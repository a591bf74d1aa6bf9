//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod blog_post;
pub mod macro_tracker;
pub mod meal_plan;
pub mod meal_selection;
pub mod user;

pub use blog_post::{BlogPostFields, BlogPostRecord, BlogPostRepository};
pub use macro_tracker::{MacroTrackerRecord, MacroTrackerRepository};
pub use meal_plan::{MealPlanFields, MealPlanRecord, MealPlanRepository};
pub use meal_selection::{MealSelectionRepository, SelectionRecord};
pub use user::{NewUser, UserChanges, UserRecord, UserRepository};
