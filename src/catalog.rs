//! In-memory list of sections with stable runtime ids.
//!
//! Ids are handed out when the catalog is built and never persisted. Edits
//! address sections and items by id rather than by list position, so a
//! reorder between picking an entry and editing it cannot hit the wrong one.

use std::fmt;
use std::path::PathBuf;

use crate::config::{Item, Section};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: ItemId,
    pub item: Item,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub id: SectionId,
    pub name: String,
    pub icon: Option<PathBuf>,
    pub collapsed: bool,
    pub entries: Vec<Entry>,
}

impl Group {
    pub fn entry_index(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    groups: Vec<Group>,
    next_id: u64,
}

impl Catalog {
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let mut catalog = Catalog::default();
        for section in sections {
            let id = SectionId(catalog.fresh_id());
            let entries = section
                .items
                .into_iter()
                .map(|item| Entry {
                    id: ItemId(catalog.fresh_id()),
                    item,
                })
                .collect();
            catalog.groups.push(Group {
                id,
                name: section.name,
                icon: section.icon,
                collapsed: section.collapsed,
                entries,
            });
        }
        catalog
    }

    /// Persisted form, in display order.
    pub fn to_sections(&self) -> Vec<Section> {
        self.groups
            .iter()
            .map(|g| Section {
                name: g.name.clone(),
                icon: g.icon.clone(),
                items: g.entries.iter().map(|e| e.item.clone()).collect(),
                collapsed: g.collapsed,
            })
            .collect()
    }

    pub fn sections(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn section(&self, id: SectionId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn section_index(&self, id: SectionId) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    pub fn item(&self, section: SectionId, item: ItemId) -> Option<&Item> {
        let group = self.section(section)?;
        group.entries.iter().find(|e| e.id == item).map(|e| &e.item)
    }

    pub fn add_section(&mut self, name: String, icon: Option<PathBuf>) -> SectionId {
        let id = SectionId(self.fresh_id());
        self.groups.push(Group {
            id,
            name,
            icon,
            collapsed: false,
            entries: Vec::new(),
        });
        id
    }

    pub fn edit_section(
        &mut self,
        id: SectionId,
        name: String,
        icon: Option<PathBuf>,
    ) -> Result<()> {
        let group = self.group_mut(id)?;
        group.name = name;
        group.icon = icon;
        Ok(())
    }

    pub fn remove_section(&mut self, id: SectionId) -> Result<Section> {
        let idx = self.section_index(id).ok_or(Error::UnknownSection(id))?;
        let group = self.groups.remove(idx);
        Ok(Section {
            name: group.name,
            icon: group.icon,
            items: group.entries.into_iter().map(|e| e.item).collect(),
            collapsed: group.collapsed,
        })
    }

    /// Shift a section by `delta` places, clamped to the list bounds.
    /// Returns the new index.
    pub fn move_section(&mut self, id: SectionId, delta: isize) -> Result<usize> {
        let idx = self.section_index(id).ok_or(Error::UnknownSection(id))?;
        let target = shifted(idx, delta, self.groups.len());
        let group = self.groups.remove(idx);
        self.groups.insert(target, group);
        Ok(target)
    }

    pub fn toggle_collapsed(&mut self, id: SectionId) -> Result<bool> {
        let group = self.group_mut(id)?;
        group.collapsed = !group.collapsed;
        Ok(group.collapsed)
    }

    pub fn add_item(&mut self, section: SectionId, item: Item) -> Result<ItemId> {
        let id = ItemId(self.fresh_id());
        self.group_mut(section)?.entries.push(Entry { id, item });
        Ok(id)
    }

    pub fn edit_item(&mut self, section: SectionId, id: ItemId, item: Item) -> Result<()> {
        let entry = self.entry_mut(section, id)?;
        entry.item = item;
        Ok(())
    }

    pub fn remove_item(&mut self, section: SectionId, id: ItemId) -> Result<Item> {
        let group = self.group_mut(section)?;
        let idx = group.entry_index(id).ok_or(Error::UnknownItem(section, id))?;
        Ok(group.entries.remove(idx).item)
    }

    pub fn move_item(&mut self, section: SectionId, id: ItemId, delta: isize) -> Result<usize> {
        let group = self.group_mut(section)?;
        let idx = group.entry_index(id).ok_or(Error::UnknownItem(section, id))?;
        let target = shifted(idx, delta, group.entries.len());
        let entry = group.entries.remove(idx);
        group.entries.insert(target, entry);
        Ok(target)
    }

    fn group_mut(&mut self, id: SectionId) -> Result<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(Error::UnknownSection(id))
    }

    fn entry_mut(&mut self, section: SectionId, id: ItemId) -> Result<&mut Entry> {
        self.group_mut(section)?
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Error::UnknownItem(section, id))
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub(crate) fn shifted(idx: usize, delta: isize, len: usize) -> usize {
    let last = len.saturating_sub(1) as isize;
    (idx as isize + delta).clamp(0, last) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ItemKind;

    fn item(name: &str) -> Item {
        Item {
            name: name.to_string(),
            kind: ItemKind::Application,
            command: name.to_lowercase(),
            icon: None,
        }
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.sections().iter().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn round_trips_sections_in_order() {
        let sections = vec![
            Section {
                name: "A".to_string(),
                items: vec![item("One"), item("Two")],
                ..Default::default()
            },
            Section {
                name: "B".to_string(),
                collapsed: true,
                ..Default::default()
            },
        ];
        let catalog = Catalog::from_sections(sections.clone());
        assert_eq!(catalog.to_sections(), sections);
    }

    #[test]
    fn ids_survive_reordering() {
        let mut catalog = Catalog::default();
        let a = catalog.add_section("A".to_string(), None);
        let b = catalog.add_section("B".to_string(), None);
        let first = catalog.add_item(a, item("First")).unwrap();
        let second = catalog.add_item(a, item("Second")).unwrap();

        assert_eq!(catalog.move_section(b, -1).unwrap(), 0);
        assert_eq!(names(&catalog), ["B", "A"]);
        assert_eq!(catalog.move_item(a, second, -5).unwrap(), 0);

        catalog.edit_item(a, first, item("Renamed")).unwrap();
        let group = catalog.section(a).unwrap();
        assert_eq!(group.entries[0].item.name, "Second");
        assert_eq!(group.entries[1].item.name, "Renamed");
    }

    #[test]
    fn moves_clamp_at_the_ends() {
        let mut catalog = Catalog::default();
        let a = catalog.add_section("A".to_string(), None);
        catalog.add_section("B".to_string(), None);
        assert_eq!(catalog.move_section(a, 10).unwrap(), 1);
        assert_eq!(catalog.move_section(a, -10).unwrap(), 0);
    }

    #[test]
    fn remove_section_takes_its_items() {
        let mut catalog = Catalog::default();
        let s = catalog.add_section("Temp".to_string(), None);
        catalog.add_item(s, item("Calc")).unwrap();
        let removed = catalog.remove_section(s).unwrap();
        assert_eq!(removed.items.len(), 1);
        assert!(catalog.is_empty());
        assert!(matches!(catalog.add_item(s, item("X")), Err(Error::UnknownSection(_))));
    }

    #[test]
    fn unknown_item_is_reported() {
        let mut catalog = Catalog::default();
        let a = catalog.add_section("A".to_string(), None);
        let b = catalog.add_section("B".to_string(), None);
        let only = catalog.add_item(a, item("Only")).unwrap();
        assert!(matches!(catalog.remove_item(b, only), Err(Error::UnknownItem(..))));
        assert_eq!(catalog.remove_item(a, only).unwrap().name, "Only");
    }

    #[test]
    fn edit_and_collapse_section() {
        let mut catalog = Catalog::default();
        let a = catalog.add_section("A".to_string(), None);
        catalog
            .edit_section(a, "Apps".to_string(), Some(PathBuf::from("apps.png")))
            .unwrap();
        assert!(catalog.toggle_collapsed(a).unwrap());
        let section = &catalog.to_sections()[0];
        assert_eq!(section.name, "Apps");
        assert_eq!(section.icon.as_deref(), Some(std::path::Path::new("apps.png")));
        assert!(section.collapsed);
    }
}
