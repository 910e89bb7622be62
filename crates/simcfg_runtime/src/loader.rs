//! The directive dispatcher and file pipeline.
//!
//! [`ModelLoader`] reads a root configuration file line by line, assembles
//! records, rewrites legacy shapes, and dispatches each record:
//!
//! - `Define` creates entities and replays registered defaults
//! - `Default` stores per-type keyword records (only before any `Define`)
//! - `Include` recursively loads another file relative to the current one
//! - `Stop` is ignored
//! - anything else is a keyword record applied to a named entity
//!
//! Every error below the root file is recovered per record: it is written to
//! the [`LogSink`] and reading continues with the next record.

use std::path::{Path, PathBuf};

use simcfg_foundation::{EntityId, EntityRef, Error, ErrorKind, Result, TypeId};
use simcfg_language::compat;
use simcfg_language::{
    DefaultDirective, DefineDirective, IncludeDirective, KeywordCommand, Record, RecordAssembler,
    RecordKind, split_commands, split_record,
};
use simcfg_storage::{Entity, Model, TypeRegistry};

use crate::config::LoadConfig;
use crate::log::LogSink;
use crate::save;
use crate::session::{LoadContext, Mode, SessionState};
use crate::source::{FileSystem, Location, SourceProvider};

/// Error and warning totals of a finished load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Errors logged.
    pub errors: usize,
    /// Warnings logged.
    pub warnings: usize,
    /// The trace file, if one was kept.
    pub log_file: Option<PathBuf>,
}

impl LoadSummary {
    /// Returns true if the load logged no errors.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.errors == 0
    }
}

/// Loads configuration text into a [`Model`] and applies live edits.
pub struct ModelLoader {
    model: Model,
    session: SessionState,
    config: LoadConfig,
    provider: Box<dyn SourceProvider>,
    root: Option<Location>,
}

impl ModelLoader {
    /// Creates a loader over a type registry, reading from the filesystem.
    #[must_use]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            model: Model::new(registry),
            session: SessionState::default(),
            config: LoadConfig::default(),
            provider: Box::new(FileSystem),
            root: None,
        }
    }

    /// Builder method to set the load configuration.
    #[must_use]
    pub fn with_config(mut self, config: LoadConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder method to read from another source.
    #[must_use]
    pub fn with_provider(mut self, provider: impl SourceProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Returns the model.
    #[must_use]
    pub const fn model(&self) -> &Model {
        &self.model
    }

    /// Returns the model mutably.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Returns the session state.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Returns the load configuration.
    #[must_use]
    pub const fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Returns the root file of the current load.
    #[must_use]
    pub const fn root(&self) -> Option<&Location> {
        self.root.as_ref()
    }

    /// Returns the number of errors logged so far.
    #[must_use]
    pub const fn errors(&self) -> usize {
        self.session.errors()
    }

    /// Returns the number of warnings logged so far.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.session.warnings()
    }

    /// Returns the first error logged by the current load, with its location.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.session.log.first_error()
    }

    /// Removes every entity and resets the session for a fresh load.
    pub fn clear(&mut self) {
        self.model.clear();
        self.session.clear(LogSink::in_memory());
        self.root = None;
    }

    /// Loads a root configuration file.
    ///
    /// The model and session are reset first. Errors inside the file are
    /// logged and counted, not returned; check [`Self::errors`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingRootFile`] if the root file does not
    /// exist, or an I/O error if it cannot be read.
    pub fn load_root(&mut self, location: Location) -> Result<()> {
        self.model.clear();
        if !self.provider.exists(&location) {
            self.session.clear(LogSink::in_memory());
            self.root = None;
            return Err(Error::new(ErrorKind::MissingRootFile(location.to_string())));
        }
        let log = self.open_log(&location);
        self.session.clear(log);

        let text = self.provider.read(&location)?;
        tracing::info!(root = %location, "loading configuration");
        self.session.log.line(&format!("Loading {location}"));
        self.root = Some(location.clone());

        let mut ctx = LoadContext::root(location);
        self.process_text(&text, &mut ctx);
        self.model.mark_loaded();
        self.session.log.flush();
        Ok(())
    }

    /// Loads a root file from a path string (`file.cfg` or `container!/file.cfg`).
    ///
    /// # Errors
    ///
    /// See [`Self::load_root`].
    pub fn load_path(&mut self, path: &str) -> Result<()> {
        self.load_root(Location::parse(path))
    }

    /// Processes text as if it were the contents of `location`, without
    /// resetting anything. Includes resolve relative to `location`.
    pub fn load_text(&mut self, location: Location, text: &str) {
        if self.root.is_none() {
            self.root = Some(location.clone());
        }
        let mut ctx = LoadContext::root(location);
        if self.session.added_records_seen {
            ctx.mode = Mode::AddedRecords;
        }
        self.process_text(text, &mut ctx);
    }

    fn open_log(&self, location: &Location) -> LogSink {
        if !self.config.write_log_file || location.container().is_some() {
            return LogSink::in_memory();
        }
        let path = location.path().with_extension("log");
        LogSink::to_file(&path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), "{err}; keeping the trace in memory");
            LogSink::in_memory()
        })
    }

    fn process_text(&mut self, text: &str, ctx: &mut LoadContext) {
        let mut assembler = RecordAssembler::new(self.config.max_brace_depth);
        let mut last_line = 0;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            last_line = line_no;

            if assembler.is_idle() && self.config.is_added_records_marker(line) {
                tracing::debug!(source = %ctx.location, line = line_no, "added-records marker");
                ctx.mode = Mode::AddedRecords;
                self.session.added_records_seen = true;
                continue;
            }

            match assembler.push_line(line, line_no) {
                Ok(Some(record)) => {
                    let line = record.line;
                    if let Err(err) = self.dispatch(record, ctx) {
                        self.report(err, &ctx.location, line);
                    }
                }
                Ok(None) => {}
                Err(err) => self.report(err, &ctx.location, line_no),
            }
        }

        if let Err(err) = assembler.finish() {
            self.report(err, &ctx.location, last_line);
        }
    }

    /// Logs an error with its source position. A line number already on the
    /// error (the first line of the record) is kept.
    fn report(&mut self, err: Error, location: &Location, line: usize) {
        let line = err
            .context
            .as_ref()
            .and_then(|c| c.line)
            .unwrap_or(line);
        let err = err.at_source(location.to_string(), line);
        self.session.log.error(&err);
    }

    fn dispatch(&mut self, record: Record, ctx: &mut LoadContext) -> Result<()> {
        let line = record.line;
        let (tokens, warnings) = compat::rewrite(record.tokens, self.model.registry().aliases());
        for warning in warnings {
            self.session
                .log
                .warning(&warning, &format!("at {}:{line}", ctx.location));
        }
        let record = Record::new(tokens, line);
        let kind = RecordKind::of(&record);
        tracing::debug!(source = %ctx.location, line, ?kind, "record");

        match kind {
            RecordKind::Define => self.define(&record, ctx),
            RecordKind::Default => self.default(&record.tokens),
            RecordKind::Include => self.include(&record.tokens, ctx),
            RecordKind::Stop => Ok(()),
            RecordKind::Keyword => self.keyword(&record, ctx.mode),
        }
    }

    // ==================== Define ====================

    fn define(&mut self, record: &Record, ctx: &LoadContext) -> Result<()> {
        self.session.defaults_settable = false;
        let directive = DefineDirective::parse(&record.tokens)?;
        let type_id = self.resolve_type(&directive.type_name)?;

        let mut first_failure = None;
        for name in &directive.names {
            if let Err(err) = self.define_one(type_id, name, ctx.mode) {
                if first_failure.is_none() {
                    first_failure = Some(err);
                } else {
                    self.report(err, &ctx.location, record.line);
                }
            }
        }
        first_failure.map_or(Ok(()), Err)
    }

    fn define_one(&mut self, type_id: TypeId, name: &EntityRef, mode: Mode) -> Result<EntityId> {
        let id = self.model.define(type_id, name)?;
        if mode.is_added() {
            self.model.mark_added(id)?;
        }

        let type_name = self.model.registry().name(type_id).to_string();
        let qualified = name.to_string();
        for tokens in self.session.defaults.records_for(&type_name, &qualified) {
            let commands = split_commands(name, &tokens[1..])?;
            self.apply_commands(id, &commands, false)?;
        }
        Ok(id)
    }

    fn resolve_type(&self, type_name: &str) -> Result<TypeId> {
        self.model
            .registry()
            .resolve(type_name)
            .ok_or_else(|| Error::not_found("entity type", type_name))
    }

    // ==================== Default ====================

    fn default(&mut self, tokens: &[String]) -> Result<()> {
        if !self.session.defaults_settable {
            return Err(Error::directive(
                &tokens[0],
                "defaults can only be set before any Define",
            ));
        }
        let directive = DefaultDirective::parse(tokens)?;
        let type_id = self.resolve_type(&directive.type_name)?;
        let type_name = self.model.registry().name(type_id).to_string();

        // Reject an entry that could never be replayed.
        split_commands(&EntityRef::global(type_name.as_str()), &directive.entry[1..])?;
        self.session.defaults.insert(type_name, directive.entry);
        Ok(())
    }

    // ==================== Include ====================

    fn include(&mut self, tokens: &[String], ctx: &mut LoadContext) -> Result<()> {
        let directive = IncludeDirective::parse(tokens)?;
        let target = ctx.location.resolve(&directive.path);

        if ctx.include_depth >= self.config.max_include_depth {
            return Err(Error::new(ErrorKind::IncludeDepthExceeded {
                limit: self.config.max_include_depth,
                path: target.to_string(),
            }));
        }
        if !self.provider.exists(&target) {
            return Err(Error::not_found("include file", target.to_string()));
        }
        let text = self.provider.read(&target)?;

        self.session.log.line(&format!("Including {target}"));
        let mut child = ctx.include(target);
        self.process_text(&text, &mut child);
        if child.mode.is_added() {
            ctx.mode = Mode::AddedRecords;
        }
        Ok(())
    }

    // ==================== Keyword ====================

    fn keyword(&mut self, record: &Record, mode: Mode) -> Result<()> {
        let commands = split_record(record)?;
        let Some(first) = commands.first() else {
            return Ok(());
        };
        let id = self.model.resolve_ref(&first.entity)?;
        self.apply_commands(id, &commands, mode.is_added())
    }

    fn apply_commands(&mut self, id: EntityId, commands: &[KeywordCommand], edit: bool) -> Result<()> {
        for command in commands {
            self.model
                .apply_keyword(id, &command.keyword, &command.args, edit)?;
        }
        Ok(())
    }

    // ==================== Live edits ====================

    /// Applies one complete record as a live user edit.
    ///
    /// The record is processed in added-records mode, so new entities are
    /// flagged as added and changed inputs as edited. Failures are logged
    /// like any other record and also returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns the error that made the record fail.
    pub fn apply_record(&mut self, record: Record) -> Result<()> {
        let location = self
            .root
            .clone()
            .unwrap_or_else(|| Location::file("<edit>"));
        let mut ctx = LoadContext::root(location);
        ctx.mode = Mode::AddedRecords;

        let line = record.line;
        self.dispatch(record, &mut ctx)
            .map_err(|err| self.report_edit(err, line))
    }

    /// Logs an error raised while reading a live edit and hands it back.
    ///
    /// Malformed input caught before a record is complete is counted the
    /// same way as a record that fails to apply.
    pub fn report_edit(&mut self, err: Error, line: usize) -> Error {
        let err = err.at_source("<edit>", line);
        self.session.log.error(&err);
        err
    }

    /// Applies one line of text (a complete record) as a live user edit.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error for an unbalanced line, or the error
    /// that made the record fail.
    pub fn apply_edit(&mut self, line: &str) -> Result<()> {
        let record = Record::from_line(line, self.config.max_brace_depth)
            .map_err(|err| self.report_edit(err, 1))?;
        match record {
            Some(record) => self.apply_record(record),
            None => Ok(()),
        }
    }

    /// Creates a session-added entity of the given type.
    ///
    /// # Errors
    ///
    /// Returns a resolution failure for an unknown type or a name collision.
    pub fn define_edit(&mut self, type_name: &str, name: &str) -> Result<EntityId> {
        self.session.defaults_settable = false;
        let type_id = self.resolve_type(type_name)?;
        self.define_one(type_id, &EntityRef::parse(name), Mode::AddedRecords)
    }

    /// Returns an entity by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.model.lookup(name)
    }

    /// Returns the current value string of `entity.keyword`.
    #[must_use]
    pub fn value(&self, name: &str, keyword: &str) -> Option<&str> {
        self.entity(name)?.input(keyword).map(|input| input.value())
    }

    // ==================== Save ====================

    /// Writes the session's edits as a delta file that includes the root.
    ///
    /// # Errors
    ///
    /// Returns an error if no root file was loaded, the target is the root
    /// file itself, or writing fails.
    pub fn save(&mut self, target: &Path) -> Result<()> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| Error::io("no configuration has been loaded"))?;
        save::save_delta(&self.model, root, target, &self.config.added_records_marker)?;
        self.model.clear_session_edited();
        tracing::info!(path = %target.display(), "saved edits");
        Ok(())
    }

    /// Writes the `.inp` input report beside the root file, or to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if no target can be determined or writing fails.
    pub fn write_report(&self, target: Option<&Path>) -> Result<PathBuf> {
        let path = match target {
            Some(path) => path.to_path_buf(),
            None => {
                let root = self
                    .root
                    .as_ref()
                    .filter(|root| root.container().is_none())
                    .ok_or_else(|| Error::io("no report path for this configuration"))?;
                root.path().with_extension("inp")
            }
        };
        save::save_report(&self.model, &path)?;
        Ok(path)
    }

    /// Closes the trace log, deleting it if nothing was logged.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the clean trace file cannot be removed.
    pub fn finish(&mut self) -> Result<LoadSummary> {
        let log = std::mem::take(&mut self.session.log);
        let summary = LoadSummary {
            errors: log.errors(),
            warnings: log.warnings(),
            log_file: if log.is_clean() {
                None
            } else {
                log.path().map(Path::to_path_buf)
            },
        };
        log.close()?;
        Ok(summary)
    }
}
