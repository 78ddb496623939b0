// Runs one CLI command against the application state. Output goes to the
// writer it is given; notices raised along the way are printed after it.
use crate::cli::{Command, ListArgs};
use crate::components::ListShell;
use crate::config::AppConfig;
use crate::state::AppState;
use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use client::prefs::Preferences;
use client::services::{upload_documents, BatchReport};
use client::ClientError;
use serde_json::{json, Value};
use shared::catalog::Resource;
use shared::models::Row;
use shared::utils::{merge_json_files, missing_keys};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct App {
    state: AppState,
}

impl App {
    /// Opens the preferences file (`prefs_path`, else the configured one)
    /// and applies environment overrides to the API settings.
    pub fn init(mut config: AppConfig, prefs_path: Option<PathBuf>) -> anyhow::Result<Self> {
        config.api = config.api.clone().with_env_overrides()?;
        let path = prefs_path.unwrap_or_else(|| config.app.preferences_file.clone());
        let prefs = Preferences::load(&path)
            .with_context(|| format!("Failed to open preferences '{}'", path.display()))?;
        Self::new(config, prefs)
    }

    pub fn new(config: AppConfig, prefs: Preferences) -> anyhow::Result<Self> {
        let state = AppState::init(config, prefs)?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run<W: Write>(&mut self, command: Command, out: &mut W) -> anyhow::Result<()> {
        let result = self.dispatch(command, out).await;
        for notice in self.state.ctx.notices_mut().drain() {
            writeln!(out, "{}", notice)?;
        }
        result
    }

    async fn dispatch<W: Write>(&mut self, command: Command, out: &mut W) -> anyhow::Result<()> {
        match command {
            Command::Login { username, password } => {
                let fallback = self.t("messages.login_failed");
                self.state
                    .ctx
                    .login(&username, &password)
                    .await
                    .map_err(|e| user_error(&e, &fallback))?;
                Ok(())
            }
            Command::Logout => Ok(self.state.ctx.logout()?),
            Command::Whoami => {
                let ctx = &self.state.ctx;
                match ctx.session() {
                    Some(s) => {
                        let line = ctx
                            .translator()
                            .t_with("app.signed_in_as", &[("user", &s.display_name())]);
                        writeln!(out, "{}", line)?;
                    }
                    None => writeln!(out, "{}", ctx.translator().t("app.not_signed_in"))?,
                }
                Ok(())
            }
            Command::Language { code: Some(code) } => Ok(self.state.ctx.set_language(&code)?),
            Command::Language { code: None } => {
                let tr = self.state.ctx.translator();
                for language in tr.languages() {
                    let marker = if language == tr.language() { "*" } else { " " };
                    writeln!(out, "{} {}", marker, language)?;
                }
                Ok(())
            }
            Command::Resources => self.resources(out),
            Command::List(args) => self.list(args, out).await,
            Command::Sort { resource, column } => self.sort(resource, &column, out),
            Command::Export { resource, out: target } => {
                self.state.ctx.require_session()?;
                let mut shell = ListShell::new(resource, self.state.view(resource));
                shell.load(&mut self.state.ctx).await?;
                let target = target.unwrap_or_else(|| self.state.config.app.export_dir.clone());
                shell.download(&mut self.state.ctx, &target, Utc::now())?;
                Ok(())
            }
            Command::Delete { resource, ids } => {
                self.state.ctx.require_session()?;
                let mut shell = ListShell::new(resource, self.state.view(resource));
                for id in &ids {
                    shell.toggle_selection(id);
                }
                let report = shell.delete_selected(&mut self.state.ctx).await?;
                report_failures(&report, |id| id.clone(), out)
            }
            Command::Upload { resource, id, files } => {
                self.state.ctx.require_session()?;
                self.upload(resource, &id, &files, out).await
            }
            Command::MergeLocales { files, out: target, check } => merge_locales(&files, target.as_deref(), check, out),
        }
    }

    fn t(&self, key: &str) -> String {
        self.state.ctx.translator().t(key)
    }

    fn resources<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let saved = self.state.saved_views();
        for resource in Resource::ALL {
            let mut flags = Vec::new();
            if resource.accepts_documents() {
                flags.push("documents");
            }
            if saved.contains(&resource) {
                flags.push("saved view");
            }
            writeln!(
                out,
                "{:<18} {:<20} {}",
                resource.path(),
                self.t(&resource.title_key()),
                flags.join(", ")
            )?;
        }
        Ok(())
    }

    async fn list<W: Write>(&mut self, args: ListArgs, out: &mut W) -> anyhow::Result<()> {
        self.state.ctx.require_session()?;
        let resource = args.resource;
        if args.reset && self.state.reset_view(resource)? {
            tracing::info!(resource = %resource, "Saved view reset");
        }

        let mut shell = ListShell::new(resource, self.state.view(resource));
        if args.clear_filters {
            shell.clear_filters();
        }
        for (name, visible) in args.show.iter().map(|n| (n, true)).chain(args.hide.iter().map(|n| (n, false))) {
            if !shell.set_column_visible(name, visible) {
                bail!("{} has no column '{}'", resource, name);
            }
        }
        for (column, value) in &args.filters {
            shell.set_filter(column, value);
        }
        for (column, direction) in &args.sorts {
            shell.set_sort(column, *direction);
        }
        if let Some(per_page) = args.per_page {
            shell.set_page_size(per_page)?;
        }
        if let Some(page) = args.page {
            shell.go_to_page(page.saturating_sub(1));
        }
        self.state.save_view(resource, &shell.view_state())?;

        shell.load(&mut self.state.ctx).await?;
        if args.json {
            let page = shell.page();
            let rows: Vec<Row> = page.items.iter().map(|r| project(r, shell.columns())).collect();
            let body = json!({
                "resource": resource,
                "page": page.page + 1,
                "per_page": page.per_page,
                "total_items": page.total_items,
                "total_pages": page.total_pages,
                "rows": rows,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        } else {
            write!(out, "{}", shell.frame(self.state.ctx.translator()).render())?;
        }
        Ok(())
    }

    fn sort<W: Write>(&mut self, resource: Resource, column: &str, out: &mut W) -> anyhow::Result<()> {
        let mut view = self.state.view(resource);
        if !view.columns.iter().any(|c| c.name == column && c.visible) {
            bail!("{} has no visible column '{}'", resource, column);
        }
        let direction = view.query.sort.toggle(column);
        self.state.save_view(resource, &view)?;

        match direction {
            Some(d) => writeln!(out, "{}: {}", column, d)?,
            None => writeln!(out, "{}: off", column)?,
        }
        for spec in view.query.sort.specs() {
            writeln!(out, "  {}. {} {}", spec.order, spec.column, spec.direction)?;
        }
        Ok(())
    }

    async fn upload<W: Write>(&mut self, resource: Resource, id: &str, files: &[PathBuf], out: &mut W) -> anyhow::Result<()> {
        let fallback = self.t("messages.upload_failed");
        let result = upload_documents(self.state.ctx.api(), resource, id, files).await;
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                self.state.ctx.notices_mut().from_error(&e, &fallback);
                return Err(user_error(&e, &fallback));
            }
        };

        let ctx = &mut self.state.ctx;
        let tr = ctx.translator();
        let text = if report.failed.is_empty() {
            tr.t_with("messages.upload_success", &[("count", &report.succeeded_count().to_string())])
        } else if report.succeeded.is_empty() {
            fallback
        } else {
            tr.t_with(
                "messages.upload_partial",
                &[
                    ("ok", &report.succeeded_count().to_string()),
                    ("failed", &report.failed_count().to_string()),
                ],
            )
        };
        if report.failed.is_empty() {
            ctx.notices_mut().success(text);
        } else {
            ctx.notices_mut().error(text);
        }
        report_failures(&report, |p| p.display().to_string(), out)
    }
}

fn user_error(err: &ClientError, fallback: &str) -> anyhow::Error {
    anyhow!(err.user_message(fallback))
}

// Visible columns of `row`, missing fields as null.
fn project(row: &Row, columns: &[shared::models::ColumnDescriptor]) -> Row {
    columns
        .iter()
        .filter(|c| c.visible)
        .map(|c| (c.name.clone(), row.get(&c.name).cloned().unwrap_or(Value::Null)))
        .collect()
}

fn report_failures<T, W, F>(report: &BatchReport<T>, label: F, out: &mut W) -> anyhow::Result<()>
where
    W: Write,
    F: Fn(&T) -> String,
{
    for (item, reason) in &report.failed {
        writeln!(out, "  {}: {}", label(item), reason)?;
    }
    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("{} of {} failed", report.failed_count(), report.total()))
    }
}

fn merge_locales<W: Write>(files: &[PathBuf], target: Option<&Path>, check: bool, out: &mut W) -> anyhow::Result<()> {
    if check {
        let reference = merge_json_files(&files[..1])?;
        let mut missing_total = 0;
        for file in &files[1..] {
            let candidate = merge_json_files(std::slice::from_ref(file))?;
            let missing = missing_keys(&reference, &candidate);
            missing_total += missing.len();
            for key in missing {
                writeln!(out, "{}: missing {}", file.display(), key)?;
            }
        }
        if missing_total > 0 {
            bail!("{} translation key(s) missing", missing_total);
        }
        writeln!(out, "all keys of {} present", display_list(&files[..1]))?;
        if target.is_none() {
            return Ok(());
        }
    }

    let merged = merge_json_files(files)?;
    let text = serde_json::to_string_pretty(&merged)?;
    match target {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            tracing::info!(files = files.len(), out = %path.display(), "Locale files merged");
        }
        None => writeln!(out, "{}", text)?,
    }
    Ok(())
}

fn display_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
