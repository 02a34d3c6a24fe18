pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) if score.is_finite() => format!("{score:.1}"),
        _ => "no risk detected".to_owned(),
    }
}

pub fn format_patterns(patterns: &[String]) -> String {
    if patterns.is_empty() {
        "none".to_owned()
    } else {
        patterns
            .iter()
            .map(|pattern| humanize(pattern))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `cycle_length_4` -> `cycle length 4`
pub fn humanize(identifier: &str) -> String {
    identifier.replace('_', " ")
}

pub fn format_seconds(seconds: Option<f64>) -> String {
    match seconds {
        Some(seconds) if seconds.is_finite() => format!("{seconds:.2}s"),
        _ => "-".to_owned(),
    }
}

pub fn format_count(count: Option<u64>) -> String {
    count.map_or_else(|| "-".to_owned(), |count| count.to_string())
}
