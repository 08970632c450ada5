//! Device configuration.

use super::UltimateTools;
use crate::envelope::{Fields, ToolFailure, ToolResult, message};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryArgs {
    /// Category name, e.g. "Drive A Settings"
    pub category: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItemArgs {
    pub category: String,
    /// Item name within the category
    pub item: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetConfigItemArgs {
    pub category: String,
    pub item: String,
    /// New value, as the device displays it
    pub value: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkConfigArgs {
    /// Object of category -> { item -> value }
    pub config: Value,
}

impl UltimateTools {
    pub async fn get_config_categories(&self) -> ToolResult {
        tracing::info!("listing config categories");
        let categories = self.client.config_categories().await?;
        Fields::new()
            .with("categories", categories.categories)
            .with("errors", categories.errors)
            .done()
    }

    pub async fn get_config_category(&self, args: CategoryArgs) -> ToolResult {
        tracing::info!(category = %args.category, "reading config category");
        let config = self.client.config_category(&args.category).await?;
        Fields::new().with("config", config).done()
    }

    pub async fn get_config_item(&self, args: ConfigItemArgs) -> ToolResult {
        tracing::info!(category = %args.category, item = %args.item, "reading config item");
        let config = self.client.config_item(&args.category, &args.item).await?;
        Fields::new().with("config", config).done()
    }

    pub async fn set_config_item(&self, args: SetConfigItemArgs) -> ToolResult {
        tracing::info!(
            category = %args.category,
            item = %args.item,
            value = %args.value,
            "setting config item"
        );
        self.client
            .set_config_item(&args.category, &args.item, &args.value)
            .await?;
        message("Config item set")
    }

    pub async fn bulk_config_update(&self, args: BulkConfigArgs) -> ToolResult {
        if !args.config.is_object() {
            return Err(ToolFailure::new(
                "config must be an object of category -> { item -> value }",
            ));
        }
        tracing::info!("applying bulk config update");
        self.client.update_configs(&args.config).await?;
        message("Config updated")
    }

    pub async fn save_config(&self) -> ToolResult {
        tracing::info!("saving config to flash");
        self.client.save_config_to_flash().await?;
        message("Config saved")
    }

    pub async fn load_config(&self) -> ToolResult {
        tracing::info!("loading config from flash");
        self.client.load_config_from_flash().await?;
        message("Config loaded")
    }

    pub async fn reset_config(&self) -> ToolResult {
        tracing::info!("resetting config to defaults");
        self.client.reset_config_to_default().await?;
        message("Config reset to defaults")
    }
}
