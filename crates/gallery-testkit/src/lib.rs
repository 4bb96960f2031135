// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use gallery_app::{ArtworkId, ArtworkPage, ArtworkRecord};

const TITLE_SUBJECTS: [&str; 16] = [
    "Harbor",
    "Orchard",
    "Cathedral",
    "Peasant Woman",
    "Haystacks",
    "River Bend",
    "Sleeping Cat",
    "Lighthouse",
    "Market Day",
    "Bather",
    "Winter Road",
    "Still Life with Pears",
    "Dancer",
    "Mountain Pass",
    "Courtyard",
    "Self-Portrait",
];
const TITLE_QUALIFIERS: [&str; 10] = [
    "at Dusk",
    "in Snow",
    "at Noon",
    "after Rain",
    "in Blue",
    "(Study)",
    "with Figures",
    "by Moonlight",
    "in Spring",
    "No. 2",
];
const PLACES: [&str; 14] = [
    "France",
    "Japan",
    "United States",
    "Italy",
    "Netherlands",
    "Peru",
    "Egypt",
    "China",
    "Mexico",
    "Spain",
    "Germany",
    "India",
    "England",
    "Greece",
];
const ARTISTS: [&str; 14] = [
    "Claude Monet",
    "Mary Cassatt",
    "Katsushika Hokusai",
    "Georges Seurat",
    "Edward Hopper",
    "Grant Wood",
    "Georgia O'Keeffe",
    "Vincent van Gogh",
    "Berthe Morisot",
    "Paul Cézanne",
    "Winslow Homer",
    "Rembrandt van Rijn",
    "Frida Kahlo",
    "Unknown Maker",
];
const INSCRIPTIONS: [&str; 6] = [
    "Signed lower right",
    "Dated lower left",
    "Stamped on verso",
    "Monogram at lower center",
    "Inscribed on reverse",
    "Gallery label on stretcher",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

#[derive(Debug, Clone)]
pub struct ArtworkFaker {
    rng: DeterministicRng,
}

impl ArtworkFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn artwork(&mut self, id: ArtworkId) -> ArtworkRecord {
        let subject = self.pick(&TITLE_SUBJECTS);
        let qualifier = self.pick(&TITLE_QUALIFIERS);
        let start = self.int_range_i64(1450, 1990);
        let span = self.int_range_i64(0, 6);
        let inscriptions = if self.rng.int_n(3) == 0 {
            None
        } else {
            Some(self.pick(&INSCRIPTIONS).to_owned())
        };

        ArtworkRecord {
            id,
            title: Some(format!("{subject} {qualifier}")),
            place_of_origin: Some(self.pick(&PLACES).to_owned()),
            artist_display: Some(self.pick(&ARTISTS).to_owned()),
            inscriptions,
            date_start: Some(start),
            date_end: Some(start + span),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.rng.next_u64() % span) as i64
    }
}

/// In-memory stand-in for the remote catalog, paged the same way.
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    records: Vec<ArtworkRecord>,
}

impl DemoCatalog {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut faker = ArtworkFaker::new(seed);
        let mut next_id: i64 = 1000;
        let records = (0..count)
            .map(|_| {
                next_id += 1 + faker.rng.int_n(40) as i64;
                faker.artwork(ArtworkId::new(next_id))
            })
            .collect();
        Self { records }
    }

    pub fn total(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn page(&self, index: usize, size: usize) -> ArtworkPage {
        let start = index.saturating_mul(size).min(self.records.len());
        let end = start.saturating_add(size).min(self.records.len());
        ArtworkPage {
            records: self.records[start..end].to_vec(),
            total: self.total(),
        }
    }
}

/// Page of untitled records with the given ids, for state and view tests.
pub fn fixture_page(ids: &[i64], total: u64) -> ArtworkPage {
    ArtworkPage {
        records: ids
            .iter()
            .copied()
            .map(|id| ArtworkRecord::untitled(ArtworkId::new(id)))
            .collect(),
        total,
    }
}
