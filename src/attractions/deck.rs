//! The deck: a paged album of every attraction, locked until discovered.

use serde::Serialize;

use super::Attraction;

/// Cards shown per deck page.
pub const ITEMS_PER_PAGE: usize = 6;

/// One album slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCard {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub is_gem: bool,
    /// Locked cards hide their description
    pub locked: bool,
    pub description: Option<String>,
}

impl From<&Attraction> for DeckCard {
    fn from(attraction: &Attraction) -> Self {
        let locked = !attraction.is_discovered();
        Self {
            id: attraction.id,
            name: attraction.name.clone(),
            icon: attraction.icon.clone(),
            is_gem: attraction.is_gem,
            locked,
            description: (!locked).then(|| attraction.description.clone()),
        }
    }
}

/// Collection progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckProgress {
    /// Total cards in the deck
    pub total: u32,
    /// Unlocked cards
    pub discovered: u32,
    /// Gems in the deck
    pub gems_total: u32,
    /// Gems found so far
    pub gems_found: u32,
}

impl DeckProgress {
    /// Calculate percentage complete
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.discovered as f32 / self.total as f32) * 100.0
        }
    }

    /// Check if fully discovered
    pub fn is_complete(&self) -> bool {
        self.discovered >= self.total
    }
}

/// A single page of the deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPage {
    /// 1-based page number actually returned
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub cards: Vec<DeckCard>,
    pub progress: DeckProgress,
}

/// Album built from the attraction list, in storage order.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<DeckCard>,
    progress: DeckProgress,
}

impl Deck {
    pub fn from_attractions(attractions: &[Attraction]) -> Self {
        let mut progress = DeckProgress::default();
        let cards = attractions
            .iter()
            .inspect(|a| {
                progress.total += 1;
                if a.is_discovered() {
                    progress.discovered += 1;
                }
                if a.is_gem {
                    progress.gems_total += 1;
                    if a.is_found {
                        progress.gems_found += 1;
                    }
                }
            })
            .map(DeckCard::from)
            .collect();

        Self { cards, progress }
    }

    pub fn progress(&self) -> DeckProgress {
        self.progress
    }

    /// Number of pages; an empty deck still has one (empty) page.
    pub fn total_pages(&self) -> usize {
        self.cards.len().div_ceil(ITEMS_PER_PAGE).max(1)
    }

    /// Get a 1-based page, clamped into the valid range.
    pub fn page(&self, page: usize) -> DeckPage {
        let total_pages = self.total_pages();
        let page = page.clamp(1, total_pages);
        let start = (page - 1) * ITEMS_PER_PAGE;
        let end = (start + ITEMS_PER_PAGE).min(self.cards.len());

        DeckPage {
            page,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
            cards: self.cards[start..end].to_vec(),
            progress: self.progress,
        }
    }
}
