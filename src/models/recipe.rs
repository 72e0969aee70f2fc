use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientItem {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

impl IngredientItem {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
        }
    }
}

impl fmt::Display for IngredientItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.amount.is_empty(), self.unit.is_empty()) {
            (true, _) => write!(f, "{}", self.name),
            (false, true) => write!(f, "{} {}", self.amount, self.name),
            (false, false) => write!(f, "{} {} {}", self.amount, self.unit, self.name),
        }
    }
}

/// Named group of ingredients, e.g. "Dough" or "Filling".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSection {
    pub section: String,
    pub items: Vec<IngredientItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub order: u32,
    pub text: String,
}

/// Named group of instruction steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSection {
    pub section: String,
    pub instructions: Vec<InstructionStep>,
}

/// Caller-supplied recipe fields.
///
/// `total_time_minutes` is stored as given; it is not checked against the
/// prep and cook times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_info: Option<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub total_time_minutes: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<IngredientSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl RecipeData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = servings;
        self
    }

    pub fn with_times(mut self, prep: u32, cook: u32, total: u32) -> Self {
        self.prep_time_minutes = prep;
        self.cook_time_minutes = cook;
        self.total_time_minutes = total;
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<IngredientSection>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps(mut self, steps: Vec<StepSection>) -> Self {
        self.steps = steps;
        self
    }
}

/// A stored recipe with its store-generated timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    #[serde(flatten)]
    pub data: RecipeData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = &self.data;
        writeln!(f, "{}", recipe.title)?;
        writeln!(f, "{}", "=".repeat(recipe.title.chars().count()))?;

        if let Some(highlight) = &recipe.highlight_info {
            writeln!(f, "{}", highlight)?;
        }
        if let Some(description) = &recipe.description {
            writeln!(f, "{}", description)?;
        }

        writeln!(f, "Servings: {}", recipe.servings)?;
        writeln!(
            f,
            "Time: {} min (prep: {} min, cook: {} min)",
            recipe.total_time_minutes, recipe.prep_time_minutes, recipe.cook_time_minutes
        )?;

        for section in &recipe.ingredients {
            writeln!(f, "\nIngredients - {}:", section.section)?;
            for item in &section.items {
                writeln!(f, "  - {}", item)?;
            }
        }

        for section in &recipe.steps {
            writeln!(f, "\nSteps - {}:", section.section)?;
            let mut steps: Vec<&InstructionStep> = section.instructions.iter().collect();
            steps.sort_by_key(|step| step.order);
            for step in steps {
                writeln!(f, "  {}. {}", step.order, step.text)?;
            }
        }

        if let Some(references) = &recipe.references {
            writeln!(f, "\nReferences: {}", references)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pancakes() -> RecipeData {
        RecipeData::new("Pancakes")
            .with_category("breakfast")
            .with_servings(4)
            .with_times(10, 15, 30)
            .with_ingredients(vec![IngredientSection {
                section: "Batter".into(),
                items: vec![
                    IngredientItem::new("flour", "200", "g"),
                    IngredientItem::new("eggs", "2", ""),
                ],
            }])
            .with_steps(vec![StepSection {
                section: "Cook".into(),
                instructions: vec![
                    InstructionStep {
                        order: 2,
                        text: "Fry".into(),
                    },
                    InstructionStep {
                        order: 1,
                        text: "Whisk".into(),
                    },
                ],
            }])
    }

    #[test]
    fn test_ingredient_display() {
        assert_eq!(IngredientItem::new("flour", "200", "g").to_string(), "200 g flour");
        assert_eq!(IngredientItem::new("eggs", "2", "").to_string(), "2 eggs");
        assert_eq!(IngredientItem::new("salt", "", "").to_string(), "salt");
    }

    #[test]
    fn test_recipe_data_uses_camel_case() {
        let json = serde_json::to_value(pancakes()).unwrap();
        assert_eq!(json["categoryId"], json!("breakfast"));
        assert_eq!(json["prepTimeMinutes"], json!(10));
        assert_eq!(json["totalTimeMinutes"], json!(30));
        assert!(json.get("images").is_none());
        assert!(json.get("highlightInfo").is_none());
    }

    #[test]
    fn test_total_time_is_not_derived() {
        let data = RecipeData::new("Tea").with_times(1, 1, 60);
        assert_eq!(data.total_time_minutes, 60);
    }

    #[test]
    fn test_recipe_decodes_minimal_document() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": "r1",
            "title": "Toast",
            "servings": 1,
            "prepTimeMinutes": 1,
            "cookTimeMinutes": 2,
            "totalTimeMinutes": 3,
            "createdAt": "2025-01-02T03:04:05Z",
            "updatedAt": "2025-01-03T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(recipe.data.title, "Toast");
        assert!(recipe.data.ingredients.is_empty());
        assert!(recipe.data.category_id.is_none());
        assert!(recipe.updated_at > recipe.created_at);
    }

    #[test]
    fn test_recipe_rejects_wrong_types() {
        let result = serde_json::from_value::<Recipe>(json!({
            "id": "r1",
            "title": "Toast",
            "servings": "lots",
            "prepTimeMinutes": 1,
            "cookTimeMinutes": 2,
            "totalTimeMinutes": 3,
            "createdAt": "2025-01-02T03:04:05Z",
            "updatedAt": "2025-01-03T03:04:05Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_recipe_display_orders_steps() {
        let recipe = Recipe {
            id: "r1".into(),
            data: pancakes(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let output = recipe.to_string();
        assert!(output.contains("Servings: 4"));
        assert!(output.contains("Time: 30 min (prep: 10 min, cook: 15 min)"));
        assert!(output.contains("  - 200 g flour"));
        let whisk = output.find("1. Whisk").unwrap();
        let fry = output.find("2. Fry").unwrap();
        assert!(whisk < fry);
    }
}
