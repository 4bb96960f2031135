// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::ArtworkId;

pub const PAGE_SIZE_OPTIONS: [usize; 5] = [3, 5, 10, 15, 30];
pub const DEFAULT_PAGE_SIZE: usize = 5;

pub fn is_valid_page_size(size: usize) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

/// One artwork as returned by the catalog. Only `id` is guaranteed; every
/// other field may be null or missing in the upstream payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub id: ArtworkId,
    pub title: Option<String>,
    pub place_of_origin: Option<String>,
    pub artist_display: Option<String>,
    pub inscriptions: Option<String>,
    pub date_start: Option<i64>,
    pub date_end: Option<i64>,
}

impl ArtworkRecord {
    pub fn untitled(id: ArtworkId) -> Self {
        Self {
            id,
            title: None,
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtworkPage {
    pub records: Vec<ArtworkRecord>,
    pub total: u64,
}

impl ArtworkPage {
    pub fn ids(&self) -> Vec<ArtworkId> {
        self.records.iter().map(|record| record.id).collect()
    }
}

/// A single outstanding fetch. `index` is zero-based; the catalog wants
/// `page_number()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub request_id: u64,
    pub index: usize,
    pub size: usize,
}

impl PageRequest {
    pub const fn page_number(self) -> usize {
        self.index + 1
    }
}
