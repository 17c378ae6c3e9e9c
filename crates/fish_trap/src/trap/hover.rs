//! Hover text content for a trap.
//!
//! Strings carry the host's localization tokens (`$piece_noaccess`, `$KEY_Use`, ...)
//! untranslated; the host localizes the final string.
use std::fmt;

/// `(fish/max)` counter shown next to the trap name.
pub fn fish_count_label(fish_count: u32, max_fish: u32) -> String {
    format!("({fish_count}/{max_fish})")
}

/// Everything the hover layer shows for a trap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverText {
    pub name: String,
    pub fish_count: u32,
    pub max_fish: u32,
    /// Whether the viewer may open the trap (not inside someone else's ward).
    pub has_access: bool,
    pub submerged: bool,
}

impl fmt::Display for HoverText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.name,
            fish_count_label(self.fish_count, self.max_fish)
        )?;
        if !self.has_access {
            return f.write_str("\n$piece_noaccess");
        }
        f.write_str("\n[<color=yellow><b>$KEY_Use</b></color>] $piece_container_open")?;
        f.write_str(" $msg_stackall_hover")?;
        if !self.submerged {
            f.write_str("\n<color=red>$msg_notinwater</color>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hover(has_access: bool, submerged: bool) -> HoverText {
        HoverText {
            name: "$piece_fishtrap".into(),
            fish_count: 2,
            max_fish: 4,
            has_access,
            submerged,
        }
    }

    #[test]
    fn label_formats_counts() {
        assert_eq!(fish_count_label(3, 4), "(3/4)");
    }

    #[test]
    fn no_access_hides_actions() {
        assert_eq!(
            hover(false, false).to_string(),
            "$piece_fishtrap (2/4)\n$piece_noaccess"
        );
    }

    #[test]
    fn dry_trap_warns() {
        let text = hover(true, false).to_string();
        assert!(text.contains("$piece_container_open $msg_stackall_hover"));
        assert!(text.ends_with("$msg_notinwater</color>"));
        assert!(!hover(true, true).to_string().contains("$msg_notinwater"));
    }
}
