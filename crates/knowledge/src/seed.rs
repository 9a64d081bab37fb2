//! Built-in corpus written on first start.

use crate::types::Document;

const SEED_LOCATION: &str = "Olathe, KS";

struct SeedEntry {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    tags: [&'static str; 4],
    content: &'static str,
}

const SEED: [SeedEntry; 10] = [
    SeedEntry {
        id: "rag-001",
        title: "Olathe Crime Statistics 2023",
        category: "crime_stats",
        tags: ["statistics", "crime", "olathe", "2023"],
        content: "Olathe PD reported 1,234 total crimes in 2023. High-crime areas include Downtown Olathe (S Kansas Ave), North Olathe (N Ridgeview Rd), and East Olathe (E 151st St). Most common crimes: theft (34%), assault (28%), robbery (18%), burglary (12%), other (8%).",
    },
    SeedEntry {
        id: "rag-002",
        title: "Active Criminal Areas in Olathe",
        category: "locations",
        tags: ["locations", "hotspots", "crime", "olathe"],
        content: "High-activity areas: 1) Downtown Olathe (S Kansas Ave, E Santa Fe St) - frequent robberies and assaults. 2) North Olathe (N Ridgeview Rd, N Black Bob Rd) - drug activity and burglaries. 3) East Olathe (E 151st St, E Dennis Ave) - vehicle thefts and vandalism. 4) South Olathe (S Mur-Len Rd) - domestic disturbances.",
    },
    SeedEntry {
        id: "rag-003",
        title: "Known Perpetrators in Olathe",
        category: "perps",
        tags: ["perpetrators", "suspects", "wanted", "olathe"],
        content: "Active subjects: Subject Alpha - last seen Downtown Olathe, involved in 3 armed robberies. Subject Bravo - wanted in North Olathe, 2 assault cases. Subject Delta - active in South Olathe, 1 burglary case. Subject Foxtrot - Central Olathe, multiple thefts.",
    },
    SeedEntry {
        id: "rag-004",
        title: "Hot Pursuit Strategy - Urban Areas",
        category: "strategy",
        tags: ["pursuit", "strategy", "urban", "tactics"],
        content: "Urban pursuit protocol: 1) Maintain safe distance (3-5 car lengths). 2) Use parallel routes when possible. 3) Coordinate with air support if available. 4) Avoid high-speed chases in residential areas. 5) Set up roadblocks at major intersections. 6) Use spike strips on highways. Success rate: 78% in Olathe urban areas.",
    },
    SeedEntry {
        id: "rag-005",
        title: "Hot Pursuit Strategy - Highway",
        category: "strategy",
        tags: ["pursuit", "strategy", "highway", "tactics"],
        content: "Highway pursuit protocol: 1) Request backup immediately. 2) Coordinate with state patrol. 3) Use PIT maneuver only on highways with clear lanes. 4) Deploy spike strips at exit ramps. 5) Maintain communication with dispatch. 6) Consider helicopter support for long pursuits. Success rate: 85% on I-35 and K-10 near Olathe.",
    },
    SeedEntry {
        id: "rag-006",
        title: "Hot Pursuit Strategy - Residential",
        category: "strategy",
        tags: ["pursuit", "strategy", "residential", "tactics"],
        content: "Residential pursuit protocol: 1) Reduce speed significantly. 2) Avoid pursuit if risk to public is high. 3) Use containment strategy - block exits. 4) Coordinate with K-9 units. 5) Use less-lethal options when possible. 6) Document all actions. Success rate: 72% in Olathe residential areas.",
    },
    SeedEntry {
        id: "rag-007",
        title: "Olathe PD Pursuit History 2023",
        category: "history",
        tags: ["history", "pursuits", "statistics", "2023"],
        content: "2023 pursuit statistics: Total pursuits: 47. Successful arrests: 38 (81%). Average duration: 8.5 minutes. Most common routes: I-35 (18 pursuits), K-10 (12 pursuits), S Kansas Ave (8 pursuits), N Ridgeview Rd (6 pursuits). Most active times: 10 PM - 2 AM (62% of pursuits).",
    },
    SeedEntry {
        id: "rag-008",
        title: "Successful Arrest Patterns in Olathe",
        category: "history",
        tags: ["history", "arrests", "patterns", "success"],
        content: "Arrest success patterns: 1) Pursuits ending on I-35: 89% success rate. 2) Pursuits ending in residential areas: 65% success rate. 3) Pursuits with air support: 94% success rate. 4) Night pursuits (10 PM - 6 AM): 78% success rate. 5) Day pursuits (6 AM - 10 PM): 84% success rate. Best approach: Containment + K-9 units.",
    },
    SeedEntry {
        id: "rag-009",
        title: "Olathe PD Case Resolution Rates",
        category: "history",
        tags: ["history", "cases", "resolution", "statistics"],
        content: "2023 case resolution: Armed Assault: 78% solved. Robbery: 82% solved. Murder: 45% solved (2 unsolved cases). Sexual Assault: 88% solved. Theft: 65% solved. Average time to resolution: 12 days. Best performing unit: Robbery division (82% closure rate).",
    },
    SeedEntry {
        id: "rag-010",
        title: "Olathe Criminal Activity by Location",
        category: "locations",
        tags: ["locations", "crime", "statistics", "olathe"],
        content: "Location-based crime data: S Kansas Ave (Downtown): 234 incidents, mostly robberies and assaults. E Santa Fe St: 189 incidents, thefts and burglaries. N Ridgeview Rd: 156 incidents, drug activity and assaults. E 151st St: 142 incidents, vehicle crimes. W Park St: 98 incidents, domestic disturbances. S Mur-Len Rd: 87 incidents, property crimes.",
    },
];

/// The fixed starting corpus: crime statistics, active areas and subjects,
/// pursuit strategies, and pursuit, arrest and case history.
pub fn seed_documents() -> Vec<Document> {
    SEED.iter()
        .map(|entry| {
            Document::new(entry.title, entry.content, entry.category)
                .with_id(entry.id)
                .with_location(SEED_LOCATION)
                .with_tags(entry.tags)
        })
        .collect()
}
