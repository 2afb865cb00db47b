use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Deterministic pseudo-random pair in `[-1, 1]` derived from `seed`.
pub fn stable_pair(seed: impl Hash) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// `node-<unix millis>`, suffixed until it no longer collides with `taken`.
pub fn unique_node_id(taken: &HashSet<String>) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let base = format!("node-{millis}");
    if !taken.contains(&base) {
        return base;
    }

    (1u32..)
        .map(|suffix| format!("{base}-{suffix}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

pub fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let mut out = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let first = stable_pair("dietary-sources");
        assert_eq!(first, stable_pair("dietary-sources"));
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }

    #[test]
    fn unique_node_id_avoids_taken_ids() {
        let first = unique_node_id(&HashSet::new());
        assert!(first.starts_with("node-"));

        let taken = HashSet::from([first.clone()]);
        let second = unique_node_id(&taken);
        assert!(!taken.contains(&second));
    }

    #[test]
    fn ellipsize_keeps_short_text() {
        assert_eq!(ellipsize("Bone Health", 20), "Bone Health");
        assert_eq!(ellipsize("Water-Soluble (B, C)", 8), "Water-S…");
    }
}
