use crate::error::Result;
use log::{info, warn};
use std::fs;
use std::path::Path;

const DEFAULT_ANIMALS: &[&str] = &[
    "Alpaca", "Bat", "Bear", "Bee", "Buffalo", "Butterfly", "Capybara", "Cat", "Chicken", "Cow",
    "Crab", "Crocodile", "Deer", "Dog", "Dolphin", "Duck", "Eagle", "Elephant", "Erawan", "Frog",
    "Gecko", "Goat", "Goldfish", "Horse", "Hornbill", "Iguana", "Jellyfish", "Koala", "Lizard",
    "Macaque", "Monkey", "Mosquito", "Mouse", "Octopus", "Ostrich", "Otter", "Owl", "Panda",
    "Parrot", "Peacock", "Penguin", "Pig", "Pigeon", "Rabbit", "Raccoon", "Rat", "Rooster",
    "Seagull", "Shark", "Sheep", "Snail", "Snake", "Spider", "Squirrel", "Tiger", "Turtle",
    "Whale", "Yak", "Zebra", "Dabenniao", "Naga",
];

/// Fixed, sorted set of animal names that completion is tracked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    names: Vec<String>,
}

impl Catalog {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Load a catalog file: one name per line, `#` starts a comment line.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_names(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );
        if catalog.is_empty() {
            warn!("Catalog {} has no entries", path.display());
        } else {
            info!("Loaded {} catalog entries from {}", catalog.len(), path.display());
        }
        Ok(catalog)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// Canonical spelling of `name`, matched case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        if let Ok(idx) = self.names.binary_search_by(|n| n.as_str().cmp(name)) {
            return Some(&self.names[idx]);
        }
        self.names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_names(DEFAULT_ANIMALS)
    }
}
