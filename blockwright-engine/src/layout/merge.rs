use super::Section;

/// What to do with a label-matched section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Keep its components and add the new ones at the end of each region.
    #[default]
    Append,
    /// Swap its components for the new ones.
    Replace,
}

/// Fit `incoming` into `existing` by label.
///
/// The first section labelled `target_label` receives the incoming components
/// according to `policy`; its template and settings are kept. When no section
/// matches, `incoming` is added after the last section. Every other section
/// comes back untouched and in its original position.
pub fn merge_section(
    existing: &[Section],
    target_label: &str,
    incoming: Section,
    policy: MergePolicy,
) -> Vec<Section> {
    let mut sections = existing.to_vec();
    match sections
        .iter_mut()
        .find(|s| s.label() == Some(target_label))
    {
        Some(target) => {
            if policy == MergePolicy::Replace {
                target.components.clear();
            }
            for component in incoming.components {
                target.push(component);
            }
        }
        None => sections.push(incoming),
    }
    sections
}
