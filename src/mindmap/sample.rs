use super::node::MindmapNode;

fn entry(id: &str, title: &str, summary: &str, category: &str) -> MindmapNode {
    let mut node = MindmapNode::new(id, title);
    node.summary = Some(summary.to_owned());
    node.category = Some(category.to_owned());
    node
}

fn described(mut node: MindmapNode, description: &str) -> MindmapNode {
    node.description = Some(description.to_owned());
    node
}

/// Tree shown when no document has been saved yet, or the saved one is unreadable.
pub fn default_tree() -> MindmapNode {
    described(
        entry(
            "vitamins-root",
            "Vitamins in Human Body",
            "Essential nutrients required for normal growth and development",
            "vitamins",
        ),
        "Vitamins are organic compounds that are vital for normal growth and development. \
         They are required in small amounts and must be obtained from the diet as the body \
         cannot produce them in sufficient quantities.",
    )
    .with_children(vec![
        described(
            entry(
                "dietary-sources",
                "Dietary Sources",
                "Natural food sources of vitamins",
                "dietary",
            ),
            "Various foods that provide essential vitamins for human health.",
        )
        .with_children(vec![
            entry(
                "fruits-vegetables",
                "Fruits & Vegetables",
                "Rich sources of vitamins A, C, and folate",
                "sources",
            ),
            entry(
                "grains-nuts",
                "Grains & Nuts",
                "Sources of B vitamins and vitamin E",
                "sources",
            ),
            entry(
                "meat-dairy",
                "Meat & Dairy",
                "Sources of B12, riboflavin, and vitamin D",
                "sources",
            ),
        ]),
        described(
            entry(
                "health-impact",
                "Health Impact & Balance",
                "Maintaining adequate vitamin levels is crucial, as both deficiencies \
                 (hypovitaminosis) and excesses (hypervitaminosis) can lead to health problems.",
                "health",
            ),
            "The impact of vitamins on human health, including deficiency and excess conditions.",
        )
        .with_children(vec![
            entry(
                "deficiency",
                "Deficiency",
                "Health problems caused by insufficient vitamin intake",
                "deficiency",
            ),
            entry(
                "excess",
                "Excess",
                "Health issues from excessive vitamin consumption",
                "excess",
            ),
        ]),
        described(
            entry(
                "key-bodily-roles",
                "Key Bodily Roles",
                "Essential functions vitamins perform in the human body",
                "health",
            ),
            "Critical roles that vitamins play in maintaining health and supporting bodily \
             functions.",
        )
        .with_children(vec![
            entry(
                "immune-support",
                "Immune Support",
                "Vitamins C, D, and A support immune system function",
                "health",
            ),
            entry(
                "energy-metabolism",
                "Energy Metabolism",
                "B vitamins help convert food into energy",
                "health",
            ),
            entry(
                "bone-health",
                "Bone Health",
                "Vitamins D and K are essential for bone formation",
                "health",
            ),
        ]),
        described(
            entry(
                "classification",
                "Classification",
                "Vitamins are classified into fat-soluble and water-soluble categories",
                "classification",
            ),
            "Understanding how vitamins are categorized based on their solubility.",
        )
        .with_children(vec![
            entry(
                "fat-soluble",
                "Fat-Soluble (A, D, E, K)",
                "Stored in body fat and liver, can accumulate",
                "classification",
            ),
            entry(
                "water-soluble",
                "Water-Soluble (B, C)",
                "Not stored in body, need regular replenishment",
                "classification",
            ),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::mindmap::node::collect_ids;

    #[test]
    fn default_tree_ids_are_unique() {
        let tree = default_tree();
        let mut ids = HashSet::new();
        collect_ids(&tree, &mut ids);
        assert_eq!(ids.len(), tree.node_count());
        assert_eq!(tree.node_count(), 15);
    }
}
