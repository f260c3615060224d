//! Keyboard settings CLI commands.

use clap::{Args, Subcommand, ValueEnum};

use crate::cli::common::{load_config, open_settings, print_json, CliError, CliResult};
use crate::models::settings::{normalize_color, FONT_FAMILIES};
use crate::models::{KeyboardSettings, Language, RgbColor};
use crate::services::SettingsStore;

/// Show or change keyboard appearance settings
#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Display current settings
    Show(SettingsShowArgs),
    /// Change one setting
    Set(SettingsSetArgs),
}

/// Display current settings
#[derive(Args, Debug)]
pub struct SettingsShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Change one setting
#[derive(Args, Debug)]
pub struct SettingsSetArgs {
    /// Setting to change
    #[arg(value_enum)]
    key: SettingKey,

    /// New value
    value: String,
}

/// Settings that can be changed from the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SettingKey {
    KeyboardFontSize,
    InputFieldFontSize,
    FontFamily,
    TextColor,
    BackgroundColor,
    BorderColor,
    Bold,
    Language,
    KeyboardHeight,
}

impl SettingsArgs {
    /// Execute settings subcommand
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let store = open_settings(&config)?;

        match &self.command {
            SettingsCommand::Show(args) => args.execute(&store),
            SettingsCommand::Set(args) => args.execute(&store),
        }
    }
}

impl SettingsShowArgs {
    fn execute(&self, store: &SettingsStore) -> CliResult<()> {
        let settings = store.current();
        if self.json {
            return print_json(&settings);
        }
        output_human_readable(&settings);
        Ok(())
    }
}

impl SettingsSetArgs {
    fn execute(&self, store: &SettingsStore) -> CliResult<()> {
        let value = self.value.trim();

        match self.key {
            SettingKey::KeyboardFontSize => {
                let size = store
                    .update_keyboard_font_size(parse_number(value)?)
                    .map_err(save_failed)?;
                println!("keyboard_font_size_sp = {size}");
            }
            SettingKey::InputFieldFontSize => {
                let size = store
                    .update_input_field_font_size(parse_number(value)?)
                    .map_err(save_failed)?;
                println!("input_field_font_size_sp = {size}");
            }
            SettingKey::KeyboardHeight => {
                let height: f32 = value
                    .parse()
                    .ok()
                    .filter(|h: &f32| h.is_finite())
                    .ok_or_else(|| CliError::validation(format!("Invalid height '{value}'")))?;
                let height = store
                    .update_keyboard_height(height)
                    .map_err(save_failed)?;
                println!("keyboard_height_dp = {height}");
            }
            SettingKey::FontFamily => {
                if value.is_empty() {
                    return Err(CliError::validation("Font family cannot be empty"));
                }
                store.update_font_family(value).map_err(save_failed)?;
                println!("font_family = {value}");
            }
            SettingKey::TextColor | SettingKey::BackgroundColor | SettingKey::BorderColor => {
                let color = normalize_color(value)
                    .map_err(|e| CliError::validation(format!("{e:#}")))?;
                match self.key {
                    SettingKey::TextColor => store.update_text_color(&color),
                    SettingKey::BackgroundColor => store.update_background_color(&color),
                    _ => store.update_border_color(&color),
                }
                .map_err(save_failed)?;
                println!("{} = {color}", self.key.field_name());
            }
            SettingKey::Bold => {
                let is_bold = match value.to_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => {
                        return Err(CliError::validation(format!(
                            "Invalid boolean '{value}'. Use true or false"
                        )))
                    }
                };
                store.update_bold(is_bold).map_err(save_failed)?;
                println!("is_bold = {is_bold}");
            }
            SettingKey::Language => {
                let language: Language = value
                    .parse()
                    .map_err(|e: anyhow::Error| CliError::validation(e.to_string()))?;
                store.update_language(language).map_err(save_failed)?;
                println!("language = {language}");
            }
        }

        Ok(())
    }
}

impl SettingKey {
    const fn field_name(self) -> &'static str {
        match self {
            Self::KeyboardFontSize => "keyboard_font_size_sp",
            Self::InputFieldFontSize => "input_field_font_size_sp",
            Self::FontFamily => "font_family",
            Self::TextColor => "text_color",
            Self::BackgroundColor => "background_color",
            Self::BorderColor => "border_color",
            Self::Bold => "is_bold",
            Self::Language => "language",
            Self::KeyboardHeight => "keyboard_height_dp",
        }
    }
}

fn save_failed(e: anyhow::Error) -> CliError {
    CliError::io(format!("Failed to save settings: {e:#}"))
}

fn parse_number(value: &str) -> CliResult<u32> {
    value
        .parse()
        .map_err(|_| CliError::validation(format!("Invalid size '{value}'")))
}

fn output_human_readable(settings: &KeyboardSettings) {
    let color_line = |name: &str, hex: &str, rgb: anyhow::Result<RgbColor>| {
        let swatch = rgb
            .ok()
            .and_then(|c| c.palette_name())
            .map(|n| format!(" ({n})"))
            .unwrap_or_default();
        println!("  {name:<18} {hex}{swatch}");
    };

    println!("Keyboard Settings");
    println!("  {:<18} {}sp", "Key font size", settings.keyboard_font_size_sp);
    println!("  {:<18} {}sp", "Input font size", settings.input_field_font_size_sp);
    println!(
        "  {:<18} {} ({:?})",
        "Font family",
        settings.font_family,
        settings.generic_font_family()
    );
    println!("  {:<18} {}", "Available fonts", FONT_FAMILIES.join(", "));
    println!("  {:<18} {}", "Bold", if settings.is_bold { "yes" } else { "no" });
    color_line("Text color", &settings.text_color, settings.text_rgb());
    color_line(
        "Background color",
        &settings.background_color,
        settings.background_rgb(),
    );
    color_line("Border color", &settings.border_color, settings.border_rgb());
    println!(
        "  {:<18} {}",
        "Language",
        settings.language.display_name()
    );
    println!("  {:<18} {}dp", "Keyboard height", settings.keyboard_height_dp);
}
