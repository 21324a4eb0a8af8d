use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_designer::{Category, ComponentRegistry, ComponentSummary};

#[derive(Debug, Args)]
pub struct ComponentsArgs {
    /// Only show components whose name or description contains this keyword
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show one category (basic, advanced, layout)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Print full descriptors as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn components(args: ComponentsArgs, registry: &ComponentRegistry) -> Result<()> {
    let category = args
        .category
        .as_deref()
        .map(|name| {
            Category::from_name(name).ok_or_else(|| {
                anyhow::anyhow!("Unknown category: {}. Use: basic, advanced, or layout", name)
            })
        })
        .transpose()?;

    let listed = select(registry, args.search.as_deref(), category);

    if args.json {
        let descriptors: Vec<_> = listed
            .iter()
            .filter_map(|summary| registry.get(&summary.type_key))
            .collect();
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("{}", "No matching components".yellow());
        return Ok(());
    }

    for group in registry.categories() {
        let entries: Vec<&ComponentSummary> = listed
            .iter()
            .filter(|summary| summary.category == group.category)
            .collect();
        if entries.is_empty() {
            continue;
        }

        println!("{}", group.title.bright_blue().bold());
        for summary in entries {
            let renderer = registry
                .renderer(&summary.type_key)
                .map(|r| r.name())
                .unwrap_or_default();
            println!(
                "  {:<10} {:<18} {} {}",
                summary.type_key.bright_white(),
                summary.name,
                summary.description.dimmed(),
                format!("[{}]", renderer).dimmed()
            );
        }
        println!();
    }

    Ok(())
}

/// Palette entries matching the filters, in palette order
fn select(
    registry: &ComponentRegistry,
    search: Option<&str>,
    category: Option<Category>,
) -> Vec<ComponentSummary> {
    let candidates: Vec<ComponentSummary> = match search {
        Some(keyword) => registry
            .search(keyword)
            .into_iter()
            .map(|hit| hit.component)
            .collect(),
        None => registry
            .categories()
            .iter()
            .flat_map(|group| group.components.iter().cloned())
            .collect(),
    };

    candidates
        .into_iter()
        .filter(|summary| category.map_or(true, |c| summary.category == c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(summaries: &[ComponentSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.type_key.as_str()).collect()
    }

    #[test]
    fn test_select_all() {
        let registry = ComponentRegistry::with_builtin_components();
        assert_eq!(select(&registry, None, None).len(), 12);
    }

    #[test]
    fn test_select_by_category() {
        let registry = ComponentRegistry::with_builtin_components();
        assert_eq!(
            keys(&select(&registry, None, Some(Category::Layout))),
            vec!["tabs", "row"]
        );
    }

    #[test]
    fn test_select_by_keyword() {
        let registry = ComponentRegistry::with_builtin_components();
        assert_eq!(
            keys(&select(&registry, Some("upload"), None)),
            vec!["file", "photo"]
        );
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let registry = ComponentRegistry::with_builtin_components();
        let args = ComponentsArgs {
            search: None,
            category: Some("exotic".to_string()),
            json: false,
        };
        assert!(components(args, &registry).is_err());
    }
}
