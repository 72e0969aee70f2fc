mod category;
mod identified;
mod recipe;
mod user;

pub use category::{slugify, Category, CategoryData};
pub use identified::Identified;
pub use recipe::{IngredientItem, IngredientSection, InstructionStep, Recipe, RecipeData, StepSection};
pub use user::{RecycleRecord, User, UserData, UserPatch};
