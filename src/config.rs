use std::fs;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_THEME: &str = "light";
pub const LEGACY_SECTION_NAME: &str = "Default";
const CONFIG_ENV: &str = "LAUNCHER_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Application,
    Script,
    Url,
}

impl ItemKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "application" => Some(ItemKind::Application),
            "script" => Some(ItemKind::Script),
            "url" => Some(ItemKind::Url),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Application => "application",
            ItemKind::Script => "script",
            ItemKind::Url => "url",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ItemKind::Application => ItemKind::Script,
            ItemKind::Script => ItemKind::Url,
            ItemKind::Url => ItemKind::Application,
        }
    }

    pub fn prev(self) -> Self {
        self.next().next()
    }
}

// Unknown, blank or non-string types launch like applications.
impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        let kind = match raw.as_ref().and_then(Value::as_str) {
            Some(s) => ItemKind::parse(s),
            None => None,
        };
        Ok(kind.unwrap_or_else(|| {
            debug!(kind = ?raw, "unrecognized item type, treating as application");
            ItemKind::Application
        }))
    }
}

/// Reads a blank field as `""` and other scalars as their text, so a
/// hand-edited `name: 2024` or `command:` doesn't fail the whole file.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(D::Error::custom("expected a string")),
    }
}

/// Reads a blank field as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default, deserialize_with = "lenient_string")]
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl PanelPosition {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top" => Some(PanelPosition::Top),
            "bottom" => Some(PanelPosition::Bottom),
            "left" => Some(PanelPosition::Left),
            "right" => Some(PanelPosition::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PanelPosition::Top => "top",
            PanelPosition::Bottom => "bottom",
            PanelPosition::Left => "left",
            PanelPosition::Right => "right",
        }
    }

    /// Clockwise around the screen edges.
    pub fn next(self) -> Self {
        match self {
            PanelPosition::Top => PanelPosition::Right,
            PanelPosition::Right => PanelPosition::Bottom,
            PanelPosition::Bottom => PanelPosition::Left,
            PanelPosition::Left => PanelPosition::Top,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, PanelPosition::Top | PanelPosition::Bottom)
    }
}

/// Where the panel sits: against an edge, or at a saved offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPlacement {
    Docked(PanelPosition),
    Floating { x: i32, y: i32 },
}

impl Default for PanelPlacement {
    fn default() -> Self {
        PanelPlacement::Docked(PanelPosition::default())
    }
}

/// `$LAUNCHER_CONFIG`, else `<config dir>/term-panel/config.yaml`.
pub fn default_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("term-panel")
        .join("config.yaml")
}

/// Reads and writes the launcher's YAML document.
///
/// Every operation re-reads the file. Writes rewrite the whole document in
/// place, keeping top-level keys they don't own.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load sections. A legacy top-level `items` list becomes a single
    /// `Default` section.
    pub fn load(&self) -> Result<Vec<Section>> {
        let doc = self.read_document()?;

        if let Some(sections) = doc.get("sections") {
            if sections.is_null() {
                return Ok(Vec::new());
            }
            return self.decode(sections);
        }

        if let Some(items) = doc.get("items") {
            let items: Vec<Item> = if items.is_null() {
                Vec::new()
            } else {
                self.decode(items)?
            };
            debug!(count = items.len(), "migrating legacy items list");
            return Ok(vec![Section {
                name: LEGACY_SECTION_NAME.to_string(),
                items,
                ..Default::default()
            }]);
        }

        Ok(Vec::new())
    }

    /// Replace `sections`, leaving other keys as they are on disk.
    pub fn save(&self, sections: &[Section]) -> Result<()> {
        let value = serde_yaml::to_value(sections).map_err(Error::Serialize)?;
        self.update(|doc| {
            doc.remove("items");
            doc.insert(key("sections"), value);
        })
    }

    pub fn load_theme(&self) -> Result<String> {
        let doc = self.read_document()?;
        Ok(doc
            .get("theme")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_THEME)
            .to_string())
    }

    pub fn save_theme(&self, theme: &str) -> Result<()> {
        self.update(|doc| {
            doc.insert(key("theme"), Value::String(theme.to_string()));
        })
    }

    /// Docked position, falling back to `top` when absent or unknown.
    pub fn load_panel_position(&self) -> Result<PanelPosition> {
        let doc = self.read_document()?;
        let raw = panel_map(&doc).and_then(|panel| panel.get("position"));
        let position = match raw.and_then(Value::as_str) {
            Some(s) => PanelPosition::parse(s).unwrap_or_else(|| {
                debug!(position = s, "unknown panel position, using top");
                PanelPosition::Top
            }),
            None => PanelPosition::Top,
        };
        Ok(position)
    }

    pub fn save_panel_position(&self, position: PanelPosition) -> Result<()> {
        let mut panel = Mapping::new();
        panel.insert(key("position"), Value::String(position.as_str().to_string()));
        self.update(|doc| {
            doc.insert(key("panel"), Value::Mapping(panel));
        })
    }

    /// `Some((x, y))` only when both coordinates are stored as integers.
    pub fn load_panel_geometry(&self) -> Result<Option<(i32, i32)>> {
        let doc = self.read_document()?;
        let Some(panel) = panel_map(&doc) else {
            return Ok(None);
        };
        let coord = |name: &str| {
            panel
                .get(name)
                .and_then(Value::as_i64)
                .and_then(|v| i32::try_from(v).ok())
        };
        Ok(coord("x").zip(coord("y")))
    }

    pub fn save_panel_geometry(&self, x: i32, y: i32) -> Result<()> {
        let mut panel = Mapping::new();
        panel.insert(key("x"), Value::Number(x.into()));
        panel.insert(key("y"), Value::Number(y.into()));
        self.update(|doc| {
            doc.insert(key("panel"), Value::Mapping(panel));
        })
    }

    /// Saved geometry wins over a docked position.
    pub fn load_panel(&self) -> Result<PanelPlacement> {
        if let Some((x, y)) = self.load_panel_geometry()? {
            return Ok(PanelPlacement::Floating { x, y });
        }
        Ok(PanelPlacement::Docked(self.load_panel_position()?))
    }

    fn decode<T: serde::de::DeserializeOwned>(&self, value: &Value) -> Result<T> {
        serde_yaml::from_value(value.clone()).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn read_document(&self) -> Result<Mapping> {
        if !self.path.exists() {
            return Ok(Mapping::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Mapping::new());
        }
        let value: Value = serde_yaml::from_str(&text).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;
        if value.is_null() {
            return Ok(Mapping::new());
        }
        self.decode(&value)
    }

    fn update(&self, apply: impl FnOnce(&mut Mapping)) -> Result<()> {
        let mut doc = self.read_document()?;
        apply(&mut doc);
        self.write_document(&doc)
    }

    fn write_document(&self, doc: &Mapping) -> Result<()> {
        let text = serde_yaml::to_string(doc).map_err(Error::Serialize)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "config written");
        Ok(())
    }
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

fn panel_map(doc: &Mapping) -> Option<&Mapping> {
    doc.get("panel").and_then(Value::as_mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(contents: &str) -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, contents).unwrap();
        (dir, ConfigStore::new(path))
    }

    fn empty_store() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("config.yaml"));
        (dir, store)
    }

    fn item(name: &str, kind: ItemKind, command: &str) -> Item {
        Item {
            name: name.to_string(),
            kind,
            command: command.to_string(),
            icon: None,
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let (_dir, store) = empty_store();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.load_theme().unwrap(), DEFAULT_THEME);
        assert_eq!(store.load_panel_position().unwrap(), PanelPosition::Top);
        assert_eq!(store.load_panel_geometry().unwrap(), None);
    }

    #[test]
    fn empty_file_loads_no_sections() {
        let (_dir, store) = store_with("");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn legacy_items_become_default_section() {
        let (_dir, store) = store_with(
            "items:\n  - name: Calc\n    type: application\n    command: calc\n  - name: Docs\n    type: url\n    command: https://docs.rs\n",
        );
        let sections = store.load().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Default");
        assert_eq!(
            sections[0].items,
            vec![
                item("Calc", ItemKind::Application, "calc"),
                item("Docs", ItemKind::Url, "https://docs.rs"),
            ]
        );
    }

    #[test]
    fn sections_key_wins_over_items() {
        let (_dir, store) =
            store_with("sections:\n  - name: Dev\n    items: []\nitems:\n  - name: Old\n");
        let sections = store.load().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Dev");
    }

    #[test]
    fn unknown_item_type_reads_as_application() {
        let (_dir, store) = store_with(
            "sections:\n  - name: A\n    items:\n      - name: X\n        type: binary\n        command: x\n",
        );
        let sections = store.load().unwrap();
        assert_eq!(sections[0].items[0].kind, ItemKind::Application);
    }

    #[test]
    fn blank_item_type_reads_as_application() {
        let (_dir, store) = store_with(
            "sections:\n  - name: A\n    items:\n      - name: X\n        type:\n        command: x\n",
        );
        let sections = store.load().unwrap();
        assert_eq!(sections[0].items[0].kind, ItemKind::Application);
        assert_eq!(sections[0].items[0].command, "x");
    }

    #[test]
    fn blank_command_reads_as_empty() {
        let (_dir, store) = store_with(
            "sections:\n  - name: A\n    items:\n      - name: X\n        type: url\n        command:\n",
        );
        let item = &store.load().unwrap()[0].items[0];
        assert_eq!(item.kind, ItemKind::Url);
        assert_eq!(item.command, "");
    }

    #[test]
    fn numeric_names_read_as_text() {
        let (_dir, store) = store_with(
            "sections:\n  - name: 2024\n    items:\n      - name: 7\n        command: true\n",
        );
        let sections = store.load().unwrap();
        assert_eq!(sections[0].name, "2024");
        assert_eq!(sections[0].items[0].name, "7");
        assert_eq!(sections[0].items[0].command, "true");
    }

    #[test]
    fn blank_items_and_collapsed_use_defaults() {
        let (_dir, store) = store_with("sections:\n  - name:\n    items:\n    collapsed:\n");
        let sections = store.load().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "");
        assert!(sections[0].items.is_empty());
        assert!(!sections[0].collapsed);
    }

    #[test]
    fn nested_name_is_still_rejected() {
        let (_dir, store) = store_with("sections:\n  - name: [a, b]\n");
        assert!(matches!(store.load(), Err(Error::Parse { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let (_dir, store) = store_with("sections: [unclosed\n");
        assert!(matches!(store.load(), Err(Error::Parse { .. })));
    }

    #[test]
    fn save_then_load_is_idempotent() {
        let (_dir, store) = empty_store();
        let sections = vec![
            Section {
                name: "Tools".to_string(),
                icon: Some(PathBuf::from("/icons/tools.png")),
                items: vec![
                    item("Term", ItemKind::Application, "alacritty"),
                    item("Backup", ItemKind::Script, "~/bin/backup.sh"),
                ],
                collapsed: false,
            },
            Section {
                name: "Web".to_string(),
                icon: None,
                items: vec![item("Rust", ItemKind::Url, "https://rust-lang.org")],
                collapsed: true,
            },
        ];
        store.save(&sections).unwrap();
        let first = store.load().unwrap();
        assert_eq!(first, sections);

        store.save(&first).unwrap();
        let text_once = fs::read_to_string(store.path()).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), text_once);
    }

    #[test]
    fn save_keeps_theme_and_panel() {
        let (_dir, store) = store_with("theme: dark\npanel:\n  position: left\nsections: []\n");
        store
            .save(&[Section {
                name: "New".to_string(),
                ..Default::default()
            }])
            .unwrap();
        assert_eq!(store.load_theme().unwrap(), "dark");
        assert_eq!(store.load_panel_position().unwrap(), PanelPosition::Left);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn save_drops_legacy_items_key() {
        let (_dir, store) = store_with("items:\n  - name: Calc\n    command: calc\n");
        let sections = store.load().unwrap();
        store.save(&sections).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(!text.contains("\nitems:") && !text.starts_with("items:"));
        assert_eq!(store.load().unwrap(), sections);
    }

    #[test]
    fn unknown_panel_position_falls_back_to_top() {
        let (_dir, store) = store_with("panel:\n  position: diagonal\n");
        assert_eq!(store.load_panel_position().unwrap(), PanelPosition::Top);

        let (_dir, store) = store_with("panel:\n  position: 3\n");
        assert_eq!(store.load_panel_position().unwrap(), PanelPosition::Top);
    }

    #[test]
    fn geometry_replaces_position() {
        let (_dir, store) = store_with("panel:\n  position: bottom\n");
        assert_eq!(store.load_panel().unwrap(), PanelPlacement::Docked(PanelPosition::Bottom));

        store.save_panel_geometry(12, -3).unwrap();
        assert_eq!(store.load_panel_geometry().unwrap(), Some((12, -3)));
        assert_eq!(store.load_panel_position().unwrap(), PanelPosition::Top);
        assert_eq!(store.load_panel().unwrap(), PanelPlacement::Floating { x: 12, y: -3 });

        store.save_panel_position(PanelPosition::Right).unwrap();
        assert_eq!(store.load_panel_geometry().unwrap(), None);
        assert_eq!(store.load_panel().unwrap(), PanelPlacement::Docked(PanelPosition::Right));
    }

    #[test]
    fn partial_geometry_is_ignored() {
        let (_dir, store) = store_with("panel:\n  x: 4\n");
        assert_eq!(store.load_panel_geometry().unwrap(), None);
    }

    #[test]
    fn theme_round_trips_without_touching_sections() {
        let (_dir, store) = store_with("sections:\n  - name: A\n    items: []\n");
        store.save_theme("nord").unwrap();
        assert_eq!(store.load_theme().unwrap(), "nord");
        assert_eq!(store.load().unwrap()[0].name, "A");
    }

    #[test]
    fn add_then_remove_section_leaves_nothing() {
        let (_dir, store) = empty_store();
        let mut sections = store.load().unwrap();
        sections.push(Section {
            name: "Temp".to_string(),
            ..Default::default()
        });
        store.save(&sections).unwrap();

        let mut sections = store.load().unwrap();
        sections[0].items.push(item("Calc", ItemKind::Application, "calc"));
        store.save(&sections).unwrap();

        let mut sections = store.load().unwrap();
        assert_eq!(sections[0].items.len(), 1);
        sections.remove(0);
        store.save(&sections).unwrap();

        let sections = store.load().unwrap();
        assert!(sections.iter().all(|s| s.name != "Temp"));
        assert!(sections.iter().all(|s| s.items.is_empty()));
    }

    #[test]
    fn kind_cycles_through_all_values() {
        let mut kind = ItemKind::Application;
        for expected in [ItemKind::Script, ItemKind::Url, ItemKind::Application] {
            kind = kind.next();
            assert_eq!(kind, expected);
        }
        assert_eq!(ItemKind::Application.prev(), ItemKind::Url);
    }
}
