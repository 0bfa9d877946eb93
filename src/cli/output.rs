//! Output formatting and progress indicators
//!
//! Renders duplicate and update reports as `pretty` (colored, tree-shaped),
//! `plain` (line oriented) or `json`. Reports are written to any
//! [`std::io::Write`] so they can be captured in tests.

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

use crate::core::duplicates::DuplicateGroup;
use crate::core::graph::Relations;
use crate::core::update::{UpdateResults, UpdateStatus};
use crate::error::ConfigError;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Plain,
    #[default]
    Pretty,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Plain => "plain",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an output format name
///
/// Names are case sensitive.
pub fn validate_output_format(format: &str) -> Result<OutputFormat, ConfigError> {
    match format {
        "json" => Ok(OutputFormat::Json),
        "plain" => Ok(OutputFormat::Plain),
        "pretty" => Ok(OutputFormat::Pretty),
        _ => Err(ConfigError::InvalidOutputFormat {
            format: format.to_string(),
        }),
    }
}

/// Whether duplicate groups should make the run fail
pub fn should_fail_on_duplicates(enabled: bool, groups: &[DuplicateGroup]) -> bool {
    enabled && !groups.is_empty()
}

/// Whether `NO_COLOR` is set to a non-empty value
pub fn no_color_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

/// Decide whether to emit color
///
/// The `--no-color` flag and `NO_COLOR` always win over the config file.
pub fn color_enabled(no_color_flag: bool, config_color: Option<bool>) -> bool {
    !no_color_flag && !no_color_env() && config_color.unwrap_or(true)
}

/// Options shared by all report renderers
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub format: OutputFormat,
    /// Merge dependants of every alias into one list per repository
    pub merge: bool,
    /// Include per-alias debug counts
    pub verbose: bool,
    pub color: bool,
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Header,
    Success,
    Warning,
    Error,
    Info,
    Dim,
    Bold,
    Url,
    Alias,
    Dependant,
}

#[derive(Debug, Clone, Copy)]
enum Icon {
    Success,
    Warning,
    Error,
    Info,
    Update,
}

/// Applies styles when color is on and passes text through when it is off
#[derive(Debug, Clone, Copy)]
struct Theme {
    color: bool,
}

impl Theme {
    fn paint(&self, text: &str, style: Style) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled: ColoredString = match style {
            Style::Header => text.bright_blue().bold().underline(),
            Style::Success => text.bright_green().bold(),
            Style::Warning => text.bright_yellow().bold(),
            Style::Error => text.bright_red().bold(),
            Style::Info => text.bright_cyan().bold(),
            Style::Dim => text.bright_black(),
            Style::Bold => text.bold(),
            Style::Url => text.cyan().underline(),
            Style::Alias => text.bright_magenta().italic(),
            Style::Dependant => text.yellow(),
        };
        styled.to_string()
    }

    fn icon(&self, icon: Icon) -> &'static str {
        match (icon, self.color) {
            (Icon::Success, true) => status::SUCCESS,
            (Icon::Warning, true) => status::WARNING,
            (Icon::Error, true) => status::ERROR,
            (Icon::Info, true) => status::INFO,
            (Icon::Update, true) => status::UPDATE,
            (Icon::Success, false) => "[✓]",
            (Icon::Warning, false) => "[!]",
            (Icon::Error, false) => "[✗]",
            (Icon::Info, false) => "[i]",
            (Icon::Update, false) => "[↑]",
        }
    }
}

// ============================================
// Duplicate report
// ============================================

#[derive(Serialize)]
struct DuplicateReportJson<'a> {
    #[serde(flatten)]
    relations: &'a Relations,
    duplicates: &'a [DuplicateGroup],
}

/// Write the duplicate report for `relations`
pub fn write_duplicate_report(
    out: &mut dyn Write,
    relations: &Relations,
    groups: &[DuplicateGroup],
    options: &ReportOptions,
) -> io::Result<()> {
    match options.format {
        OutputFormat::Json => {
            let report = DuplicateReportJson {
                relations,
                duplicates: groups,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)
        }
        OutputFormat::Plain => write_duplicates_plain(out, relations, groups, options),
        OutputFormat::Pretty => write_duplicates_pretty(out, relations, groups, options),
    }
}

fn write_duplicates_plain(
    out: &mut dyn Write,
    relations: &Relations,
    groups: &[DuplicateGroup],
    options: &ReportOptions,
) -> io::Result<()> {
    let theme = Theme {
        color: options.color,
    };
    writeln!(out, "{}", theme.paint("Dependency Analysis Report", Style::Header))?;

    if groups.is_empty() {
        writeln!(
            out,
            "{}",
            theme.paint("No duplicate inputs detected in the repositories analyzed.", Style::Warning)
        )?;
        return Ok(());
    }

    for group in groups {
        writeln!(out, "{}", theme.paint(&format!("Input: {}", group.repository), Style::Info))?;

        if options.merge {
            let dependants = group.merged_dependants(relations);
            if !dependants.is_empty() {
                let line = format!("  Dependants: {}", dependants.join(", "));
                writeln!(out, "{}", theme.paint(&line, Style::Dependant))?;
            }
            continue;
        }

        for version in &group.versions {
            writeln!(out, "  Version: {}", theme.paint(&version.url, Style::Url))?;
            for alias in &version.aliases {
                let dependants = relations.dependants(alias);
                writeln!(out, "{}", theme.paint(&format!("    Alias: {alias}"), Style::Alias))?;
                writeln!(
                    out,
                    "{}{}",
                    theme.paint("      Dependants: ", Style::Dependant),
                    dependants.join(", ")
                )?;
                if options.verbose {
                    let line = format!("      [Debug] {} inputs depend on {alias}", dependants.len());
                    writeln!(out, "{}", theme.paint(&line, Style::Dim))?;
                }
            }
        }
    }
    Ok(())
}

fn write_duplicates_pretty(
    out: &mut dyn Write,
    relations: &Relations,
    groups: &[DuplicateGroup],
    options: &ReportOptions,
) -> io::Result<()> {
    let theme = Theme {
        color: options.color,
    };
    let repositories = crate::core::duplicates::group_by_repository(relations).len();
    let extra: usize = groups.iter().map(DuplicateGroup::extra_versions).sum();

    writeln!(out, "{}", theme.paint("🔍 Flint - Dependency Analysis Report", Style::Header))?;

    if repositories == 0 {
        let line = format!("{} No inputs found in lockfile", theme.icon(Icon::Info));
        writeln!(out, "{}", theme.paint(&line, Style::Info))?;
        return writeln!(out);
    }

    let line = format!("{} Analyzing {repositories} unique inputs...", theme.icon(Icon::Info));
    writeln!(out, "{}", theme.paint(&line, Style::Info))?;

    if groups.is_empty() {
        let line = format!("{} No duplicate inputs detected", theme.icon(Icon::Success));
        writeln!(out, "{}", theme.paint(&line, Style::Success))?;
        writeln!(out)?;
        let line = "All inputs use unique versions. Your dependency tree is optimized!";
        return writeln!(out, "{}", theme.paint(line, Style::Dim));
    }

    let line = format!(
        "{} Found {} inputs with multiple versions ({extra} total duplicates)",
        theme.icon(Icon::Warning),
        groups.len()
    );
    writeln!(out, "{}", theme.paint(&line, Style::Warning))?;
    writeln!(out)?;
    writeln!(out, "{}", theme.paint("📋 Detailed Analysis:", Style::Bold))?;
    writeln!(out)?;

    for (index, group) in groups.iter().enumerate() {
        let title = format!("({}) {}", index + 1, group.display_name());
        writeln!(out, "{}", theme.paint(&title, Style::Error))?;
        writeln!(
            out,
            "   {} {}{}",
            theme.paint("├─", Style::Dim),
            theme.paint("Repository: ", Style::Bold),
            theme.paint(&group.repository, Style::Url)
        )?;
        writeln!(
            out,
            "   {} {}",
            theme.paint("├─", Style::Dim),
            theme.paint(&format!("Versions: {}", group.versions.len()), Style::Warning)
        )?;

        if options.merge {
            let dependants = group.merged_dependants(relations);
            let last = theme.paint("└─", Style::Dim);
            if dependants.is_empty() {
                writeln!(out, "   {last} {}", theme.paint("No direct dependants", Style::Dim))?;
            } else {
                let line = format!("Used by: {}", dependants.join(", "));
                writeln!(out, "   {last} {}", theme.paint(&line, Style::Dependant))?;
            }
            writeln!(out)?;
            continue;
        }

        for (v, version) in group.versions.iter().enumerate() {
            let last_version = v + 1 == group.versions.len();
            let (connector, rail) = if last_version { ("└─", " ") } else { ("├─", "│") };
            writeln!(
                out,
                "   {} {}",
                theme.paint(connector, Style::Dim),
                theme.paint(&version.url, Style::Url)
            )?;

            for (a, alias) in version.aliases.iter().enumerate() {
                let last_alias = a + 1 == version.aliases.len();
                let branch = if last_alias { "└─" } else { "├─" };
                let sub_rail = if last_alias { " " } else { "│" };
                writeln!(
                    out,
                    "   {}  {} {}",
                    theme.paint(rail, Style::Dim),
                    theme.paint(branch, Style::Dim),
                    theme.paint(&format!("Alias: {alias}"), Style::Alias)
                )?;

                let dependants = relations.dependants(alias);
                if !dependants.is_empty() {
                    let line = format!("Used by: {}", dependants.join(", "));
                    writeln!(
                        out,
                        "   {}  {}    {} {}",
                        theme.paint(rail, Style::Dim),
                        theme.paint(sub_rail, Style::Dim),
                        theme.paint("└─", Style::Dim),
                        theme.paint(&line, Style::Dependant)
                    )?;
                }
                if options.verbose {
                    let line = format!("Debug: {} dependants", dependants.len());
                    writeln!(
                        out,
                        "   {}  {}    {} {}",
                        theme.paint(rail, Style::Dim),
                        theme.paint(sub_rail, Style::Dim),
                        theme.paint("└─", Style::Dim),
                        theme.paint(&line, Style::Dim)
                    )?;
                }
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", theme.paint(&"━".repeat(48), Style::Dim))?;
    writeln!(out, "{}", theme.paint("📊 Summary:", Style::Bold))?;
    writeln!(out)?;
    let line = format!("{} {} inputs have duplicate versions", theme.icon(Icon::Error), groups.len());
    writeln!(out, "{}", theme.paint(&line, Style::Error))?;
    let line = format!("{} {extra} total duplicate dependencies detected", theme.icon(Icon::Warning));
    writeln!(out, "{}", theme.paint(&line, Style::Warning))?;
    writeln!(out)?;
    let line = format!("{} Recommendation:", theme.icon(Icon::Info));
    writeln!(out, "{}", theme.paint(&line, Style::Info))?;
    writeln!(out, "   Consider using 'inputs.<name>.follows' in your flake.nix to deduplicate")?;
    writeln!(out, "   dependencies and reduce closure size.")?;
    writeln!(out)?;
    writeln!(out, "{}", theme.paint("   Example:", Style::Dim))?;
    writeln!(
        out,
        "{}",
        theme.paint("   inputs.someInput.inputs.nixpkgs.follows = \"nixpkgs\";", Style::Dim)
    )
}

// ============================================
// Update report
// ============================================

fn short_rev(rev: &str) -> &str {
    rev.get(..7).unwrap_or(rev)
}

/// Write the update report
pub fn write_update_report(
    out: &mut dyn Write,
    results: &UpdateResults,
    options: &ReportOptions,
) -> io::Result<()> {
    match options.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, results)?;
            writeln!(out)
        }
        OutputFormat::Plain => {
            for status in &results.updates {
                writeln!(out, "{}", plain_update_line(status))?;
            }
            Ok(())
        }
        OutputFormat::Pretty => write_updates_pretty(out, results, options),
    }
}

fn plain_update_line(status: &UpdateStatus) -> String {
    if let Some(error) = &status.error {
        return format!("{}: error: {error}", status.input_name);
    }
    if status.is_update {
        return format!(
            "{}: {} -> {} ({})",
            status.input_name, status.current_rev, status.latest_rev, status.latest_url
        );
    }
    format!("{}: up to date ({})", status.input_name, status.current_rev)
}

fn write_updates_pretty(
    out: &mut dyn Write,
    results: &UpdateResults,
    options: &ReportOptions,
) -> io::Result<()> {
    let theme = Theme {
        color: options.color,
    };
    writeln!(out, "{}", theme.paint("🔄 Flint - Update Report", Style::Header))?;
    writeln!(out)?;

    let width = results
        .updates
        .iter()
        .map(|s| s.input_name.len())
        .max()
        .unwrap_or_default();

    for status in &results.updates {
        let name = format!("{:<width$}", status.input_name);
        if let Some(error) = &status.error {
            writeln!(
                out,
                "{} {} {}",
                theme.paint(theme.icon(Icon::Error), Style::Error),
                theme.paint(&name, Style::Bold),
                theme.paint(error, Style::Error)
            )?;
        } else if status.is_update {
            writeln!(
                out,
                "{} {} {} → {} {}",
                theme.paint(theme.icon(Icon::Update), Style::Warning),
                theme.paint(&name, Style::Bold),
                theme.paint(short_rev(&status.current_rev), Style::Dim),
                theme.paint(short_rev(&status.latest_rev), Style::Success),
                theme.paint(&status.latest_url, Style::Url)
            )?;
        } else {
            writeln!(
                out,
                "{} {} {}",
                theme.paint(theme.icon(Icon::Success), Style::Success),
                theme.paint(&name, Style::Bold),
                theme.paint(&format!("up to date ({})", short_rev(&status.current_rev)), Style::Dim)
            )?;
        }
    }

    let outdated = results.outdated().count();
    let failed = results.failed().count();
    writeln!(out)?;
    writeln!(out, "{}", theme.paint("📊 Summary:", Style::Bold))?;
    let line = format!(
        "{outdated} of {} inputs have updates available",
        results.updates.len()
    );
    let style = if outdated > 0 { Style::Warning } else { Style::Success };
    writeln!(out, "   {}", theme.paint(&line, style))?;
    if failed > 0 {
        let line = format!("{failed} inputs could not be checked");
        writeln!(out, "   {}", theme.paint(&line, Style::Error))?;
    }
    Ok(())
}

// ============================================
// Progress and errors
// ============================================

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", "Error:".red().bold());
    for cause in error.chain().skip(1) {
        eprintln!("  {} {cause}", "Caused by:".bright_black());
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";

    /// Update available prefix
    pub const UPDATE: &str = "⬆";
}
