use anyhow::Result;

use tt_core::{Label, Outcome, Session};
use tt_store::Store;

pub struct AppOptions {
    pub dry_run: bool,
    pub auto_save: bool,
}

/// Interactive session state: one key press, one action, one queue
/// recomputation. Auto-save failures land in the status line and the log,
/// never abort the loop.
pub struct App {
    session: Session,
    store: Store,
    options: AppOptions,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, store: Store, options: AppOptions) -> Self {
        Self {
            session,
            store,
            options,
            status: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store_handle(&self) -> &Store {
        &self.store
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Persist the current classification state.
    pub fn save(&self) -> tt_store::Result<()> {
        self.store.save_terms(&self.session.store().records())
    }

    /// Dispatch one key press. Unrecognized keys do nothing.
    pub fn handle_key(&mut self, key: char) -> Result<()> {
        match key {
            'q' => {
                self.should_quit = true;
                Ok(())
            }
            'w' => {
                match self.save() {
                    Ok(()) => self.status = Some("written".to_string()),
                    Err(e) => {
                        tracing::warn!("explicit save failed: {e}");
                        self.status = Some(format!("save failed: {e}"));
                    }
                }
                Ok(())
            }
            'u' => self.undo(),
            'p' => self.postpone(),
            _ => match Label::from_key(key) {
                Some(label) => self.classify(label),
                None => Ok(()),
            },
        }
    }

    fn classify(&mut self, label: Label) -> Result<()> {
        let Some(term) = self.session.current().map(str::to_string) else {
            self.status = Some("nothing left to classify".to_string());
            return Ok(());
        };
        self.session.classify(label)?;
        tracing::info!(term = %term, label = label.name(), "classified");
        self.status = None;
        self.auto_save();
        Ok(())
    }

    fn postpone(&mut self) -> Result<()> {
        let Some(term) = self.session.current().map(str::to_string) else {
            self.status = Some("nothing left to postpone".to_string());
            return Ok(());
        };
        self.session.postpone()?;
        tracing::info!(term = %term, "postponed");
        self.status = None;
        self.auto_save();
        Ok(())
    }

    fn undo(&mut self) -> Result<()> {
        match self.session.undo()? {
            Outcome::NoOp => {
                self.status = Some("nothing to undo".to_string());
            }
            _ => {
                tracing::info!("undone");
                self.status = None;
                self.auto_save();
            }
        }
        Ok(())
    }

    fn auto_save(&mut self) {
        if self.options.dry_run || !self.options.auto_save {
            return;
        }
        if let Err(e) = self.save() {
            tracing::warn!("auto-save failed: {e}");
            self.status = Some(format!("auto-save failed: {e}"));
        }
    }
}
