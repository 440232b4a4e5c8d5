use std::{path::PathBuf, sync::Arc, time::Duration};

use study_buddy_server::{
    errors::AppError,
    models::domain::{ExtractionMetadata, Material, MaterialFormat},
    repositories::{JsonMaterialRepository, MaterialRepository},
};

fn material(file_name: &str, text: &str) -> Material {
    Material::new(
        file_name,
        MaterialFormat::from_file_name(file_name).unwrap_or(MaterialFormat::Pdf),
        text.to_string(),
        Some("General".to_string()),
        PathBuf::from("uploads").join(file_name),
        ExtractionMetadata {
            file_size: text.len() as u64,
            page_count: Some(1),
            ..Default::default()
        },
    )
}

/// Behaviour every `MaterialRepository` implementation must share.
async fn run_contract(repository: Arc<dyn MaterialRepository>) {
    assert!(repository.list().await.expect("list").is_empty());

    // get(add(x)) returns x unchanged
    let first = material("algebra.pdf", "Linear equations have one solution.");
    let stored = repository.insert(first.clone()).await.expect("insert first");
    assert_eq!(stored, first);
    assert_eq!(
        repository.find_by_id(&first.id).await.expect("find"),
        Some(first.clone())
    );

    // duplicate ids are rejected and leave the original intact
    let mut duplicate = material("other.pdf", "Different text");
    duplicate.id = first.id.clone();
    assert!(matches!(
        repository.insert(duplicate).await,
        Err(AppError::ValidationError(_))
    ));
    assert_eq!(
        repository.find_by_id(&first.id).await.expect("find").map(|m| m.text),
        Some(first.text.clone())
    );

    // empty text never enters the registry
    assert!(matches!(
        repository.insert(material("empty.pdf", "  \n ")).await,
        Err(AppError::ValidationError(_))
    ));

    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = material("deck.pptx", "Slide 1: Vectors");
    repository.insert(second.clone()).await.expect("insert second");

    let ids: Vec<String> = repository
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);

    // delete removes from list and lookups
    let removed = repository.delete(&first.id).await.expect("delete");
    assert_eq!(removed.map(|m| m.id), Some(first.id.clone()));
    assert_eq!(repository.find_by_id(&first.id).await.expect("find"), None);
    assert_eq!(repository.delete(&first.id).await.expect("delete again"), None);

    let remaining = repository.list().await.expect("list");
    assert_eq!(remaining, vec![second]);
}

#[tokio::test]
async fn in_memory_repository_satisfies_contract() {
    run_contract(Arc::new(JsonMaterialRepository::in_memory())).await;
}

#[tokio::test]
async fn file_backed_repository_satisfies_contract() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository = JsonMaterialRepository::open(dir.path().join("index").join("materials.json"))
        .await
        .expect("open");

    run_contract(Arc::new(repository)).await;

    let reopened = JsonMaterialRepository::open(dir.path().join("index").join("materials.json"))
        .await
        .expect("reopen");
    let materials = reopened.list().await.expect("list");
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].file_name, "deck.pptx");
    assert_eq!(materials[0].format, MaterialFormat::Pptx);
}

#[tokio::test]
async fn concurrent_inserts_are_all_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repository: Arc<dyn MaterialRepository> = Arc::new(
        JsonMaterialRepository::open(dir.path().join("materials.json"))
            .await
            .expect("open"),
    );

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repository = Arc::clone(&repository);
            tokio::spawn(async move {
                repository
                    .insert(material(&format!("notes-{}.docx", i), "Some text"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task").expect("insert");
    }

    assert_eq!(repository.list().await.expect("list").len(), 16);

    let reopened = JsonMaterialRepository::open(dir.path().join("materials.json"))
        .await
        .expect("reopen");
    assert_eq!(reopened.list().await.expect("list").len(), 16);
}
