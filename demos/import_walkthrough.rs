//! Walkthrough: link imported series under their patients and query branches

use patient_hierarchy::prelude::*;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::from_file_with_env(&path)?,
        Err(_) => Config::default_config(),
    };
    patient_hierarchy::observability::init_from_config(&config.logging);

    println!("=== Patient Hierarchy Walkthrough ===\n");

    let index = HierarchyIndex::new(config.hierarchy.clone());
    let names = config.hierarchy.attributes.clone();
    let mut scene = Scene::new();

    // Series nodes as a DICOM import leaves them: no parents yet
    let imported = [
        ("PAT-001", "1.2.840.1", "1.2.840.1.1", "CT"),
        ("PAT-001", "1.2.840.1", "1.2.840.1.2", "RTSTRUCT"),
        ("PAT-001", "1.2.840.2", "1.2.840.2.1", "RTDOSE"),
        ("PAT-002", "1.2.840.3", "1.2.840.3.1", "CT"),
    ];

    println!("1. Importing series...");
    let mut data_nodes = Vec::new();
    for (patient, study, series, modality) in imported {
        let data = scene.add_node(SceneNode::data(format!("{} {}", modality, series), modality));
        scene.add_node(
            SceneNode::hierarchy(series)
                .with_attribute(names.node_type.as_str(), names.node_type_value.as_str())
                .with_attribute(names.level.as_str(), HierarchyLevel::SERIES)
                .with_attribute(names.uid.as_str(), series)
                .with_associated_node(data),
        );

        let placement = index.insert_series(&mut scene, patient, study, series)?;
        println!(
            "   ✓ {} {} -> study {} (created {} node(s))",
            modality, series, study, placement.created_count()
        );
        data_nodes.push(data);
    }

    println!("\n2. Branch queries...");
    let (ct, structures, dose, other_ct) = (data_nodes[0], data_nodes[1], data_nodes[2], data_nodes[3]);
    println!("   CT / RTSTRUCT same study:   {}", index.same_branch(&scene, &ct, &structures, Some("Study")));
    println!("   CT / RTDOSE same study:     {}", index.same_branch(&scene, &ct, &dose, Some("Study")));
    println!("   CT / RTDOSE same patient:   {}", index.same_branch(&scene, &ct, &dose, Some("Patient")));
    println!("   CT / other CT same patient: {}", index.same_branch(&scene, &ct, &other_ct, Some("Patient")));

    println!("\n3. Statistics");
    println!("{}", serde_json::to_string_pretty(&index.stats(&scene))?);

    Ok(())
}
