use std::sync::Arc;

use uuid::Uuid;

use estate_adapters::InMemoryListingProvider;
use estate_core::{CoreEngineError, InMemoryWorkflowEventStore, SubmissionPipeline, WorkflowEventKind,
                  WorkflowEventStore};
use estate_domain::{FormState, MediaFile, MediaItem};

fn file(name: &str) -> MediaFile {
    MediaFile { name: name.into(), content_type: "image/jpeg".into(), bytes: vec![1] }
}

fn approved(name: &str) -> MediaItem {
    let mut item = MediaItem::new(file(name));
    item.status = estate_domain::MediaStatus::Approved;
    item
}

fn remote(name: &str, url: &str) -> MediaItem {
    MediaItem::existing_remote(file(name), name.into(), url.into())
}

#[tokio::test]
async fn parent_creation_failure_issues_zero_uploads() {
    let provider = InMemoryListingProvider::new();
    provider.fail_create(true);
    let pipeline = SubmissionPipeline::new(Arc::new(provider.clone()));
    let mut events = InMemoryWorkflowEventStore::default();

    let media = vec![approved("a.jpg"), approved("b.jpg")];
    let err = pipeline.submit(Uuid::new_v4(), &FormState::new(), &media, None, &mut events)
                      .await
                      .unwrap_err();

    assert!(matches!(err, CoreEngineError::ParentCreationFailed(_)));
    assert_eq!(provider.upload_calls(), 0, "fail fast: no orphaned media");
}

#[tokio::test]
async fn partial_upload_failure_attaches_the_survivors() {
    let provider = InMemoryListingProvider::new();
    for name in ["c.jpg", "d.jpg", "e.jpg"] {
        provider.fail_upload_of(name);
    }
    let pipeline = SubmissionPipeline::new(Arc::new(provider.clone()));
    let mut events = InMemoryWorkflowEventStore::default();

    let media: Vec<MediaItem> =
        ["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"].iter().map(|n| approved(n)).collect();
    let report = pipeline.submit(Uuid::new_v4(), &FormState::new(), &media, None, &mut events)
                         .await
                         .unwrap();

    assert_eq!(report.uploaded, 2);
    assert_eq!(report.failed, 3);
    assert!(report.message.as_deref().unwrap().contains("3 of 5"));

    // The two surviving URLs reached the parent despite the failures.
    let stored = provider.listing(report.listing_id).unwrap();
    assert_eq!(stored.media.len(), 2);
}

#[tokio::test]
async fn clean_submission_carries_no_failure_message() {
    let provider = InMemoryListingProvider::new();
    let pipeline = SubmissionPipeline::new(Arc::new(provider.clone()));
    let mut events = InMemoryWorkflowEventStore::default();

    let media = vec![approved("a.jpg"), approved("b.jpg")];
    let report = pipeline.submit(Uuid::new_v4(), &FormState::new(), &media, None, &mut events)
                         .await
                         .unwrap();

    assert_eq!(report.failed, 0);
    // Callers render their own success copy; the report stays silent.
    assert_eq!(report.message, None);
}

#[tokio::test]
async fn total_upload_failure_keeps_the_parent() {
    let provider = InMemoryListingProvider::new();
    provider.fail_upload_of("a.jpg");
    provider.fail_upload_of("b.jpg");
    let pipeline = SubmissionPipeline::new(Arc::new(provider.clone()));
    let mut events = InMemoryWorkflowEventStore::default();

    let media = vec![approved("a.jpg"), approved("b.jpg")];
    let report = pipeline.submit(Uuid::new_v4(), &FormState::new(), &media, None, &mut events)
                         .await
                         .unwrap();

    assert_eq!(report.uploaded, 0);
    assert_eq!(report.failed, 2);
    assert!(report.message.as_deref().unwrap().contains("none of the 2"));
    // Parent survives; the user retries media attachment, not the listing.
    assert!(provider.listing(report.listing_id).is_some());
}

#[tokio::test]
async fn edit_folds_existing_and_new_urls() {
    let provider = InMemoryListingProvider::new();
    let pipeline = SubmissionPipeline::new(Arc::new(provider.clone()));
    let mut events = InMemoryWorkflowEventStore::default();

    // Pre-existing listing with two remote photos plus one new approved.
    let existing_id = {
        use estate_core::ListingProvider;
        provider.create(&FormState::new()).await.unwrap()
    };
    // The edit flow hydrates the form from the backend payload.
    let form = FormState::from_json_str(
        r#"{"title":"Bright 2BHK near the lake","category":"residential","sub_category":"apartment"}"#,
    ).unwrap();
    let media = vec![remote("old1.jpg", "http://cdn.test/old/1"),
                     remote("old2.jpg", "http://cdn.test/old/2"),
                     approved("new.jpg")];

    let report = pipeline.submit(Uuid::new_v4(), &form, &media, Some(existing_id), &mut events)
                         .await
                         .unwrap();

    assert_eq!(report.listing_id, existing_id);
    assert_eq!(report.uploaded, 1, "only the new item is uploaded");
    assert_eq!(report.attached.len(), 3, "existing + new URLs in one list");
    assert!(report.attached.contains(&"http://cdn.test/old/1".to_string()));
}

#[tokio::test]
async fn parent_created_precedes_every_upload_event() {
    let provider = InMemoryListingProvider::new();
    provider.fail_upload_of("b.jpg");
    let pipeline = SubmissionPipeline::new(Arc::new(provider.clone()));
    let mut events = InMemoryWorkflowEventStore::default();
    let workflow_id = Uuid::new_v4();

    let media = vec![approved("a.jpg"), approved("b.jpg")];
    pipeline.submit(workflow_id, &FormState::new(), &media, None, &mut events).await.unwrap();

    let log = events.list(workflow_id);
    let parent_seq = log.iter()
                        .find(|e| matches!(e.kind, WorkflowEventKind::ParentCreated { .. }))
                        .map(|e| e.seq)
                        .expect("ParentCreated event missing");
    for ev in &log {
        if matches!(ev.kind,
                    WorkflowEventKind::MediaUploaded { .. } | WorkflowEventKind::MediaUploadFailed { .. })
        {
            assert!(ev.seq > parent_seq);
        }
    }
}
