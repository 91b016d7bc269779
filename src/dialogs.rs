//! Modal forms and pickers. They hold values and react to keys; applying a
//! result is the caller's job.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{Item, ItemKind, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Pending,
    Accepted,
    Cancelled,
}

/// One labelled line of a form, as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    pub label: &'static str,
    pub value: String,
    /// Choice fields cycle with Left/Right instead of taking text.
    pub choice: bool,
}

impl FormRow {
    fn text(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
            choice: false,
        }
    }

    fn choice(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
            choice: true,
        }
    }
}

pub trait Form {
    fn title(&self) -> &'static str;
    fn rows(&self) -> Vec<FormRow>;
    fn focus(&self) -> usize;
    fn handle_key(&mut self, key: KeyEvent) -> FormOutcome;
}

/// Shared key handling: field navigation, accept/cancel and text editing on
/// the focused field. `edit` gets the focused index and the key.
fn navigate(
    focus: &mut usize,
    len: usize,
    key: KeyEvent,
    edit: impl FnOnce(usize, KeyEvent),
) -> FormOutcome {
    match key.code {
        KeyCode::Enter => return FormOutcome::Accepted,
        KeyCode::Esc => return FormOutcome::Cancelled,
        KeyCode::Tab | KeyCode::Down => *focus = (*focus + 1) % len,
        KeyCode::BackTab | KeyCode::Up => *focus = (*focus + len - 1) % len,
        _ => edit(*focus, key),
    }
    FormOutcome::Pending
}

fn edit_text(value: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => {
            value.pop();
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            value.push(c);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => value.clear(),
        _ => {}
    }
}

fn optional_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

fn path_text(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct SectionForm {
    name: String,
    icon: String,
    focus: usize,
}

impl SectionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_section(name: &str, icon: Option<&PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            icon: path_text(icon),
            focus: 0,
        }
    }

    pub fn name(&self) -> String {
        self.name.trim().to_string()
    }

    pub fn icon(&self) -> Option<PathBuf> {
        optional_path(&self.icon)
    }

    pub fn to_section(&self) -> Section {
        Section {
            name: self.name(),
            icon: self.icon(),
            ..Default::default()
        }
    }
}

impl Form for SectionForm {
    fn title(&self) -> &'static str {
        "Section"
    }

    fn rows(&self) -> Vec<FormRow> {
        vec![
            FormRow::text("Name", &self.name),
            FormRow::text("Icon", &self.icon),
        ]
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        let (name, icon) = (&mut self.name, &mut self.icon);
        navigate(&mut self.focus, 2, key, |focus, key| match focus {
            0 => edit_text(name, key),
            _ => edit_text(icon, key),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    name: String,
    kind: ItemKind,
    command: String,
    icon: String,
    focus: usize,
}

impl ItemForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            kind: item.kind,
            command: item.command.clone(),
            icon: path_text(item.icon.as_ref()),
            focus: 0,
        }
    }

    pub fn to_item(&self) -> Item {
        Item {
            name: self.name.trim().to_string(),
            kind: self.kind,
            command: self.command.trim().to_string(),
            icon: optional_path(&self.icon),
        }
    }
}

impl Form for ItemForm {
    fn title(&self) -> &'static str {
        "Launcher Item"
    }

    fn rows(&self) -> Vec<FormRow> {
        vec![
            FormRow::text("Name", &self.name),
            FormRow::choice("Type", self.kind.as_str()),
            FormRow::text("Command/URL", &self.command),
            FormRow::text("Icon", &self.icon),
        ]
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        let Self { name, kind, command, icon, focus } = self;
        navigate(focus, 4, key, |focus, key| match focus {
            0 => edit_text(name, key),
            1 => match key.code {
                KeyCode::Right | KeyCode::Char(' ') => *kind = kind.next(),
                KeyCode::Left => *kind = kind.prev(),
                _ => {}
            },
            2 => edit_text(command, key),
            _ => edit_text(icon, key),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Pending,
    Picked(usize),
    Cancelled,
}

/// Choose one entry from a list of names.
#[derive(Debug, Clone)]
pub struct Picker {
    pub title: String,
    pub label: String,
    pub options: Vec<String>,
    pub cursor: usize,
}

impl Picker {
    pub fn new(
        title: impl Into<String>,
        label: impl Into<String>,
        options: Vec<String>,
        cursor: usize,
    ) -> Self {
        let cursor = cursor.min(options.len().saturating_sub(1));
        Self {
            title: title.into(),
            label: label.into(),
            options,
            cursor,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickOutcome {
        if self.options.is_empty() {
            return PickOutcome::Cancelled;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(self.options.len() - 1);
            }
            KeyCode::Enter => return PickOutcome::Picked(self.cursor),
            KeyCode::Esc | KeyCode::Char('q') => return PickOutcome::Cancelled,
            _ => {}
        }
        PickOutcome::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
    pub is_error: bool,
}

impl Message {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            is_error: false,
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut impl Form, text: &str) {
        for c in text.chars() {
            assert_eq!(form.handle_key(key(KeyCode::Char(c))), FormOutcome::Pending);
        }
    }

    #[test]
    fn section_form_trims_and_drops_empty_icon() {
        let mut form = SectionForm::new();
        type_str(&mut form, "  Games ");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "   ");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Accepted);
        let section = form.to_section();
        assert_eq!(section.name, "Games");
        assert_eq!(section.icon, None);
    }

    #[test]
    fn item_form_edits_every_field() {
        let mut form = ItemForm::new();
        type_str(&mut form, "Docs");
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Left));
        form.handle_key(key(KeyCode::Down));
        type_str(&mut form, "https://docs.rs");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "/icons/doc.png");
        let item = form.to_item();
        assert_eq!(item.name, "Docs");
        assert_eq!(item.kind, ItemKind::Url);
        assert_eq!(item.command, "https://docs.rs");
        assert_eq!(item.icon, Some(PathBuf::from("/icons/doc.png")));
    }

    #[test]
    fn item_form_prefills_from_item() {
        let item = Item {
            name: "Calc".to_string(),
            kind: ItemKind::Script,
            command: "calc".to_string(),
            icon: None,
        };
        let mut form = ItemForm::from_item(&item);
        assert_eq!(form.rows()[1].value, "script");
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.to_item().name, "Cal");
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Cancelled);
    }

    #[test]
    fn focus_wraps_backwards() {
        let mut form = ItemForm::new();
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), 3);
    }

    #[test]
    fn picker_clamps_cursor_and_picks() {
        let mut picker = Picker::new("Edit", "Select section", vec!["A".into(), "B".into()], 9);
        assert_eq!(picker.cursor, 1);
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.cursor, 1);
        picker.handle_key(key(KeyCode::Up));
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickOutcome::Picked(0));
    }
}
