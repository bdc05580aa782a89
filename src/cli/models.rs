use crate::core::catalog::{self, AiModel, ToolType};
use crate::core::terminal::{GuideSection, STAR, print_warn};

/// One printable row per model; the recommended one is starred.
pub(crate) fn model_rows(models: &[&AiModel], recommended: Option<&str>) -> Vec<(String, String)> {
    models
        .iter()
        .map(|m| {
            let star = if Some(m.id.as_str()) == recommended {
                format!(" {}", STAR)
            } else {
                String::new()
            };
            (
                m.id.clone(),
                format!(
                    "{} [{} / {}]{}",
                    m.name,
                    m.provider.as_str(),
                    m.category.as_str(),
                    star
                ),
            )
        })
        .collect()
}

pub(super) fn print_models(tool: Option<&str>) {
    match tool {
        Some(name) => match name.parse::<ToolType>() {
            Ok(tool) => {
                let models = catalog::models_for_tool(tool);
                let rows = model_rows(&models, Some(catalog::recommended_model(tool)));
                print_section(&format!("Models for {}", tool), &rows);
            }
            Err(e) => {
                print_warn(&format!("{}; showing text models.", e));
                let models = catalog::models_for_tool_name(name);
                print_section("Text models", &model_rows(&models, None));
            }
        },
        None => {
            let models: Vec<&AiModel> = catalog::catalog().models.iter().collect();
            print_section("Model catalog", &model_rows(&models, None));

            let mut defaults = GuideSection::new("Recommended per tool");
            for tool in ToolType::ALL {
                defaults = defaults.status(tool.as_str(), catalog::recommended_model(tool));
            }
            defaults.print();
        }
    }
    println!();
}

fn print_section(title: &str, rows: &[(String, String)]) {
    rows.iter()
        .fold(GuideSection::new(title), |section, (id, about)| {
            section.command(id, about)
        })
        .print();
}
