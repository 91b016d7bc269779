//! Main panel state: selection, modals, and the edit/save/rebuild cycle.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Group, ItemId, SectionId, shifted};
use crate::config::{ConfigStore, Item, PanelPlacement, PanelPosition, Section};
use crate::dialogs::{Form, FormOutcome, ItemForm, Message, PickOutcome, Picker, SectionForm};
use crate::error::Result;
use crate::launcher::Launch;
use crate::theme::Theme;

/// Offset a docked panel starts from when it is first moved.
const FLOAT_ORIGIN: (i32, i32) = (2, 1);

#[derive(Debug, Clone)]
pub enum Modal {
    Section {
        form: SectionForm,
        target: Option<SectionId>,
    },
    Item {
        form: ItemForm,
        section: SectionId,
        target: Option<ItemId>,
    },
    Confirm {
        picker: Picker,
        action: Removal,
    },
    Message(Message),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Section(SectionId),
    Item(SectionId, ItemId),
}

pub struct App<L: Launch> {
    store: ConfigStore,
    launcher: L,
    catalog: Catalog,
    theme: Theme,
    placement: PanelPlacement,
    last_docked: PanelPosition,
    visible: bool,
    section: usize,
    item: usize,
    modal: Option<Modal>,
    status: Option<String>,
    should_quit: bool,
}

impl<L: Launch> App<L> {
    pub fn new(store: ConfigStore, launcher: L) -> Result<Self> {
        let catalog = Catalog::from_sections(store.load()?);
        let theme = Theme::by_name(&store.load_theme()?);
        let placement = store.load_panel()?;
        let last_docked = match placement {
            PanelPlacement::Docked(position) => position,
            PanelPlacement::Floating { .. } => PanelPosition::default(),
        };
        info!(
            path = %store.path().display(),
            sections = catalog.len(),
            theme = theme.name,
            "launcher ready"
        );
        Ok(Self {
            store,
            launcher,
            catalog,
            theme,
            placement,
            last_docked,
            visible: true,
            section: 0,
            item: 0,
            modal: None,
            status: None,
            should_quit: false,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn placement(&self) -> PanelPlacement {
        self.placement
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected_section(&self) -> usize {
        self.section
    }

    pub fn selected_item(&self) -> usize {
        self.item
    }

    fn current_group(&self) -> Option<&Group> {
        self.catalog.sections().get(self.section)
    }

    /// Ids of the selected item; `None` when its section is collapsed.
    fn current_entry(&self) -> Option<(SectionId, ItemId)> {
        let group = self.current_group()?;
        if group.collapsed {
            return None;
        }
        let entry = group.entries.get(self.item)?;
        Some((group.id, entry.id))
    }

    fn current_item(&self) -> Option<&Item> {
        let (section, id) = self.current_entry()?;
        self.catalog.item(section, id)
    }

    /// Text for the status line: the last message, else the selected
    /// item's command.
    pub fn status_text(&self) -> String {
        if let Some(status) = &self.status {
            return status.clone();
        }
        match self.current_item() {
            Some(item) => format!("{} · {}", item.kind.as_str(), item.command),
            None if self.catalog.is_empty() => "No sections yet. Press A to add one.".to_string(),
            None => String::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.modal.is_some() {
            self.handle_modal_key(key);
            return;
        }
        self.status = None;

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Tab => self.visible = !self.visible,
            _ if !self.visible => {}

            KeyCode::Left if alt => self.move_section(-1),
            KeyCode::Right if alt => self.move_section(1),
            KeyCode::Left if shift => self.nudge_panel(-1, 0),
            KeyCode::Right if shift => self.nudge_panel(1, 0),
            KeyCode::Up if shift => self.nudge_panel(0, -1),
            KeyCode::Down if shift => self.nudge_panel(0, 1),

            KeyCode::Left | KeyCode::Char('h') => self.select_section(-1),
            KeyCode::Right | KeyCode::Char('l') => self.select_section(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_item(-1),
            KeyCode::Down | KeyCode::Char('j') => self.select_item(1),
            KeyCode::Char('K') => self.move_item(-1),
            KeyCode::Char('J') => self.move_item(1),

            KeyCode::Enter => self.activate(),
            KeyCode::Char(' ') => self.toggle_collapsed(),

            KeyCode::Char('A') => self.open_add_section(),
            KeyCode::Char('E') => self.open_edit_section(),
            KeyCode::Char('D') => self.open_remove_section(),
            KeyCode::Char('a') => self.open_add_item(),
            KeyCode::Char('e') => self.open_edit_item(),
            KeyCode::Char('d') => self.open_remove_item(),

            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('p') => self.cycle_position(),
            KeyCode::Char('o') => self.open_config(),
            KeyCode::Char('r') => self.reload_or_report(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let Some(mut modal) = self.modal.take() else {
            return;
        };
        let keep = match &mut modal {
            Modal::Section { form, target } => match form.handle_key(key) {
                FormOutcome::Pending => true,
                FormOutcome::Cancelled => false,
                FormOutcome::Accepted => {
                    let (form, target) = (form.clone(), *target);
                    self.apply_section_form(&form, target);
                    false
                }
            },
            Modal::Item { form, section, target } => match form.handle_key(key) {
                FormOutcome::Pending => true,
                FormOutcome::Cancelled => false,
                FormOutcome::Accepted => {
                    let (item, section, target) = (form.to_item(), *section, *target);
                    self.apply_item_form(item, section, target);
                    false
                }
            },
            Modal::Confirm { picker, action } => match picker.handle_key(key) {
                PickOutcome::Pending => true,
                PickOutcome::Cancelled => false,
                PickOutcome::Picked(choice) => {
                    if picker.options.get(choice).map(String::as_str) == Some(CONFIRM_YES) {
                        self.apply_removal(*action);
                    }
                    false
                }
            },
            Modal::Message(_) => false,
        };
        // Applying an edit may have raised an error message; keep that one.
        if keep && self.modal.is_none() {
            self.modal = Some(modal);
        }
    }

    // --- navigation ---

    fn select_section(&mut self, delta: isize) {
        if self.catalog.is_empty() {
            return;
        }
        self.section = shifted(self.section, delta, self.catalog.len());
        self.item = 0;
    }

    fn select_item(&mut self, delta: isize) {
        let Some(group) = self.current_group() else {
            return;
        };
        if group.collapsed || group.entries.is_empty() {
            return;
        }
        self.item = shifted(self.item, delta, group.entries.len());
    }

    fn clamp_selection(&mut self) {
        self.section = self.section.min(self.catalog.len().saturating_sub(1));
        let items = self.current_group().map_or(0, |g| g.entries.len());
        self.item = self.item.min(items.saturating_sub(1));
    }

    fn activate(&mut self) {
        // Without a selectable item the cursor sits on the section header.
        if self.current_item().is_some() {
            self.launch_selected();
        } else if self.current_group().is_some() {
            self.toggle_collapsed();
        }
    }

    fn launch_selected(&mut self) {
        let Some(item) = self.current_item().cloned() else {
            return;
        };
        match self.launcher.launch(&item) {
            Ok(()) => self.status = Some(format!("Launched {}", item.name)),
            Err(e) => {
                warn!(name = %item.name, "launch failed: {e}");
                self.modal = Some(Modal::Message(Message::error(
                    "Launch Failed",
                    format!("Could not open {}:\n{e}", item.command),
                )));
            }
        }
    }

    // --- edits ---

    fn open_add_section(&mut self) {
        self.modal = Some(Modal::Section {
            form: SectionForm::new(),
            target: None,
        });
    }

    fn open_edit_section(&mut self) {
        let Some(group) = self.current_group() else {
            return;
        };
        self.modal = Some(Modal::Section {
            form: SectionForm::from_section(&group.name, group.icon.as_ref()),
            target: Some(group.id),
        });
    }

    fn open_remove_section(&mut self) {
        let Some(group) = self.current_group() else {
            return;
        };
        self.modal = Some(confirm(
            "Remove Section",
            format!("Remove section '{}' and its {} items?", group.name, group.entries.len()),
            Removal::Section(group.id),
        ));
    }

    fn open_add_item(&mut self) {
        let Some(group) = self.current_group() else {
            self.modal = Some(Modal::Message(Message::info(
                "No Sections",
                "Please add a section first.",
            )));
            return;
        };
        self.modal = Some(Modal::Item {
            form: ItemForm::new(),
            section: group.id,
            target: None,
        });
    }

    fn open_edit_item(&mut self) {
        let Some((section, id)) = self.current_entry() else {
            return;
        };
        let Some(item) = self.catalog.item(section, id) else {
            return;
        };
        self.modal = Some(Modal::Item {
            form: ItemForm::from_item(item),
            section,
            target: Some(id),
        });
    }

    fn open_remove_item(&mut self) {
        let Some((section, id)) = self.current_entry() else {
            return;
        };
        let Some(item) = self.catalog.item(section, id) else {
            return;
        };
        self.modal = Some(confirm(
            "Remove Item",
            format!("Remove item '{}'?", item.name),
            Removal::Item(section, id),
        ));
    }

    fn apply_section_form(&mut self, form: &SectionForm, target: Option<SectionId>) {
        let Section { name, icon, .. } = form.to_section();
        let result = self.commit(|catalog| match target {
            Some(id) => catalog.edit_section(id, name, icon).map(|()| catalog.section_index(id)),
            None => {
                let id = catalog.add_section(name, icon);
                Ok(catalog.section_index(id))
            }
        });
        if let Some(Some(idx)) = result {
            if target.is_none() {
                self.item = 0;
            }
            self.section = idx;
            self.clamp_selection();
        }
    }

    fn apply_item_form(&mut self, item: Item, section: SectionId, target: Option<ItemId>) {
        let result = self.commit(|catalog| {
            let id = match target {
                Some(id) => catalog.edit_item(section, id, item).map(|()| id)?,
                None => catalog.add_item(section, item)?,
            };
            let group = catalog.section(section);
            Ok(catalog
                .section_index(section)
                .zip(group.and_then(|g| g.entry_index(id))))
        });
        if let Some(Some((section, item))) = result {
            self.section = section;
            self.item = item;
            self.clamp_selection();
        }
    }

    fn apply_removal(&mut self, removal: Removal) {
        let removed = self.commit(|catalog| match removal {
            Removal::Section(id) => catalog.remove_section(id).map(|s| s.name),
            Removal::Item(section, id) => catalog.remove_item(section, id).map(|i| i.name),
        });
        if let Some(name) = removed {
            self.status = Some(format!("Removed {name}"));
        }
    }

    fn move_section(&mut self, delta: isize) {
        let Some(id) = self.current_group().map(|g| g.id) else {
            return;
        };
        if let Some(idx) = self.commit(|catalog| catalog.move_section(id, delta)) {
            self.section = idx;
            self.clamp_selection();
        }
    }

    fn move_item(&mut self, delta: isize) {
        let Some((section, id)) = self.current_entry() else {
            return;
        };
        if let Some(idx) = self.commit(|catalog| catalog.move_item(section, id, delta)) {
            self.item = idx;
            self.clamp_selection();
        }
    }

    fn toggle_collapsed(&mut self) {
        let Some(id) = self.current_group().map(|g| g.id) else {
            return;
        };
        if self.commit(|catalog| catalog.toggle_collapsed(id)).is_some() {
            self.item = 0;
        }
    }

    /// Apply an edit, write the whole document, then rebuild from disk.
    /// Errors become a message dialog and yield `None`.
    fn commit<T>(&mut self, edit: impl FnOnce(&mut Catalog) -> Result<T>) -> Option<T> {
        let result = edit(&mut self.catalog)
            .and_then(|value| self.store.save(&self.catalog.to_sections()).map(|()| value))
            .and_then(|value| self.reload().map(|()| value));
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("edit failed: {e}");
                self.modal = Some(Modal::Message(Message::error("Save Failed", e.to_string())));
                None
            }
        }
    }

    // --- panel settings ---

    fn cycle_theme(&mut self) {
        let next = self.theme.next();
        match self.store.save_theme(next.name) {
            Ok(()) => {
                self.theme = next;
                self.status = Some(format!("Theme: {}", next.name));
            }
            Err(e) => self.report("Save Failed", e.to_string()),
        }
    }

    fn cycle_position(&mut self) {
        let position = match self.placement {
            PanelPlacement::Docked(position) => position.next(),
            PanelPlacement::Floating { .. } => self.last_docked,
        };
        match self.store.save_panel_position(position) {
            Ok(()) => {
                self.placement = PanelPlacement::Docked(position);
                self.last_docked = position;
                self.status = Some(format!("Docked {}", position.as_str()));
            }
            Err(e) => self.report("Save Failed", e.to_string()),
        }
    }

    fn nudge_panel(&mut self, dx: i32, dy: i32) {
        let (x, y) = match self.placement {
            PanelPlacement::Floating { x, y } => (x, y),
            PanelPlacement::Docked(_) => FLOAT_ORIGIN,
        };
        let (x, y) = (x.saturating_add(dx).max(0), y.saturating_add(dy).max(0));
        match self.store.save_panel_geometry(x, y) {
            Ok(()) => {
                self.placement = PanelPlacement::Floating { x, y };
                self.status = Some(format!("Panel at {x},{y}"));
            }
            Err(e) => self.report("Save Failed", e.to_string()),
        }
    }

    fn open_config(&mut self) {
        let path = self.store.path().to_path_buf();
        if let Err(e) = self.launcher.open_path(&path) {
            self.report("Open Failed", e.to_string());
        }
    }

    // --- loading ---

    /// Rebuild the catalog from disk, keeping the selection by position.
    pub fn reload(&mut self) -> Result<()> {
        let sections = self.store.load()?;
        self.catalog = Catalog::from_sections(sections);
        self.clamp_selection();
        debug!(sections = self.catalog.len(), "catalog rebuilt");
        Ok(())
    }

    fn reload_or_report(&mut self) {
        match self.reload() {
            Ok(()) => self.status = Some("Reloaded".to_string()),
            Err(e) => self.report("Reload Failed", e.to_string()),
        }
    }

    fn report(&mut self, title: &str, body: String) {
        warn!("{title}: {body}");
        self.modal = Some(Modal::Message(Message::error(title, body)));
    }
}

const CONFIRM_YES: &str = "Remove";

fn confirm(title: &str, label: String, action: Removal) -> Modal {
    Modal::Confirm {
        picker: Picker::new(title, label, vec!["Cancel".to_string(), CONFIRM_YES.to_string()], 0),
        action,
    }
}
