//! Content selection shared by both layouts.
//!
//! Inclusion rule for repeated sections: only entries with a non-empty primary field
//! (title / degree / name) are shown, and a section with no such entries is omitted.
//! Optional sections additionally require their toggle.

use crate::models::resume::{Achievement, Education, Experience, Language, Project, ResumeRecord};

pub fn visible_experience(record: &ResumeRecord) -> Vec<&Experience> {
    record
        .experience
        .iter()
        .filter(|e| !e.title.is_empty())
        .collect()
}

pub fn visible_education(record: &ResumeRecord) -> Vec<&Education> {
    record
        .education
        .iter()
        .filter(|e| !e.degree.is_empty())
        .collect()
}

pub fn visible_projects(record: &ResumeRecord) -> Vec<&Project> {
    if !record.section_toggles.projects {
        return Vec::new();
    }
    record
        .projects
        .iter()
        .filter(|p| !p.title.is_empty())
        .collect()
}

pub fn visible_achievements(record: &ResumeRecord) -> Vec<&Achievement> {
    if !record.section_toggles.achievements {
        return Vec::new();
    }
    record
        .achievements
        .iter()
        .filter(|a| !a.title.is_empty())
        .collect()
}

pub fn visible_languages(record: &ResumeRecord) -> Vec<&Language> {
    if !record.section_toggles.languages {
        return Vec::new();
    }
    record
        .languages
        .iter()
        .filter(|l| !l.name.is_empty())
        .collect()
}

pub fn visible_hobbies(record: &ResumeRecord) -> Option<&str> {
    if record.section_toggles.hobbies && !record.hobbies.trim().is_empty() {
        Some(record.hobbies.as_str())
    } else {
        None
    }
}

pub fn visible_summary(record: &ResumeRecord) -> Option<&str> {
    if record.summary.trim().is_empty() {
        None
    } else {
        Some(record.summary.as_str())
    }
}

/// Splits a comma-delimited skills string into display chips. Items are trimmed and
/// empty items skipped; nothing is deduplicated or reordered.
pub fn parse_chips(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decorative fill percentage for a skill bar, in 70..=95.
///
/// FNV-1a over the position and the skill text, so the same skill at the same position
/// always draws the same bar.
pub fn skill_level(position: usize, skill: &str) -> u8 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let position = (position as u64).to_le_bytes();
    let mut hash = FNV_OFFSET;
    for byte in position.iter().chain(skill.as_bytes()) {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    70 + (hash % 26) as u8
}

/// Up to two uppercase initials from the full name.
pub fn initials(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Non-empty contact items in display order: email, phone, location.
pub fn contact_items(record: &ResumeRecord) -> Vec<&str> {
    [
        record.email.as_str(),
        record.phone.as_str(),
        record.location.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.trim().is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::SectionToggles;

    fn with_languages(toggle: bool, names: &[&str]) -> ResumeRecord {
        ResumeRecord {
            languages: names
                .iter()
                .map(|n| Language {
                    name: n.to_string(),
                    ..Language::default()
                })
                .collect(),
            section_toggles: SectionToggles {
                languages: toggle,
                ..SectionToggles::default()
            },
            ..ResumeRecord::default()
        }
    }

    #[test]
    fn test_toggle_off_hides_populated_section() {
        let record = with_languages(false, &["French", "German"]);
        assert!(visible_languages(&record).is_empty());
    }

    #[test]
    fn test_toggle_on_with_blank_entries_hides_section() {
        let record = with_languages(true, &["", ""]);
        assert!(visible_languages(&record).is_empty());
    }

    #[test]
    fn test_blank_entries_filtered_out() {
        let record = with_languages(true, &["", "French", ""]);
        let visible = visible_languages(&record);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "French");
    }

    #[test]
    fn test_experience_needs_title_not_company() {
        let record = ResumeRecord {
            experience: vec![Experience {
                company: "Acme".to_string(),
                ..Experience::default()
            }],
            ..ResumeRecord::default()
        };
        assert!(visible_experience(&record).is_empty());
    }

    #[test]
    fn test_hobbies_require_toggle_and_text() {
        let mut record = ResumeRecord {
            hobbies: "Chess".to_string(),
            ..ResumeRecord::default()
        };
        assert_eq!(visible_hobbies(&record), None);
        record.section_toggles.hobbies = true;
        assert_eq!(visible_hobbies(&record), Some("Chess"));
        record.hobbies = "   ".to_string();
        assert_eq!(visible_hobbies(&record), None);
    }

    #[test]
    fn test_parse_chips_keeps_duplicates_and_order() {
        assert_eq!(
            parse_chips(" Rust, Go,,rust , Go "),
            vec!["Rust", "Go", "rust", "Go"]
        );
        assert!(parse_chips("").is_empty());
    }

    #[test]
    fn test_skill_level_is_deterministic_and_bounded() {
        for (i, skill) in ["Rust", "SQL", "Kubernetes", "", "日本語"].iter().enumerate() {
            let level = skill_level(i, skill);
            assert!((70..=95).contains(&level), "level {level} out of range");
            assert_eq!(level, skill_level(i, skill));
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("jane doe"), "JD");
        assert_eq!(initials("Jane Q. Public"), "JQ");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_contact_items_skip_blanks() {
        let record = ResumeRecord {
            email: "jane@x.com".to_string(),
            location: "Berlin".to_string(),
            ..ResumeRecord::default()
        };
        assert_eq!(contact_items(&record), vec!["jane@x.com", "Berlin"]);
    }
}
