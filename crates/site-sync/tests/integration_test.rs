use site_sync::config::SyncConfig;
use site_sync::lifecycle::SiteSystem;
use site_sync::model::{
    Project, ProjectCreate, ProjectFilter, ProjectId, ProjectStatus, ProjectUpdate,
    SupplierCreate, SupplierFilter, SupplierUpdate,
};
use std::time::Duration;
use store_framework::{ResourceAccess, ResourceError, SyncOptions, SyncPhase, ViewState};
use tokio::sync::watch;

async fn wait_for_view(
    rx: &mut watch::Receiver<ViewState<Project>>,
    pred: impl FnMut(&ViewState<Project>) -> bool,
) -> ViewState<Project> {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(pred))
        .await
        .expect("timed out waiting for view")
        .expect("view closed")
        .clone()
}

fn tower_a() -> ProjectCreate {
    ProjectCreate::new("Tower A", "Acme", ProjectStatus::Planning, 1_000_000.0)
}

/// Shape of a project that ignores store-assigned fields.
fn summary(project: &Project) -> (String, String, ProjectStatus, f64, f64) {
    (
        project.name.clone(),
        project.client.clone(),
        project.status,
        project.budget,
        project.spent,
    )
}

#[tokio::test]
async fn test_tower_a_gets_defaults_and_store_assigned_fields() {
    let system = SiteSystem::new();
    let hook = system.projects.sync(SyncOptions::manual());

    // 1. Create through the hook
    let id = hook.create(tower_a()).await.unwrap();

    // 2. The resynced view holds exactly that record
    let state = hook.state();
    assert_eq!(state.phase(), SyncPhase::Ready);
    assert_eq!(state.records.len(), 1);
    let project = &state.records[0];
    assert_eq!(project.id, id);
    assert!(!project.id.0.is_empty());
    assert_eq!(project.status, ProjectStatus::Planning);
    assert_eq!(project.budget, 1_000_000.0);
    assert_eq!(project.spent, 0.0);
    assert_eq!(project.progress, 0.0);
    assert_eq!(project.team_size, 0);
    assert_eq!(project.created_at, project.updated_at);

    drop(hook);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_search_properties() {
    let system = SiteSystem::new();
    let projects = &system.projects;
    projects.create(tower_a()).await.unwrap();
    projects
        .create(ProjectCreate::new("Harbor Depot", "ACME Logistics", ProjectStatus::Active, 10.0))
        .await
        .unwrap();
    projects
        .create(ProjectCreate::new("School Annex", "City", ProjectStatus::Active, 20.0))
        .await
        .unwrap();

    // 1. No criteria behaves like list
    let all = projects.list().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(projects.search(&ProjectFilter::default()).await.unwrap(), all);
    assert_eq!(projects.search(&ProjectFilter::term("")).await.unwrap(), all);

    // 2. Term matches name or client, ignoring case, newest first
    let acme = projects.search(&ProjectFilter::term("aCmE")).await.unwrap();
    let names: Vec<_> = acme.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Harbor Depot", "Tower A"]);

    let annex = projects.search(&ProjectFilter::term("annex")).await.unwrap();
    assert_eq!(annex.len(), 1);

    // 3. Status restricts further
    let active_acme = projects
        .search(&ProjectFilter::term("acme").with_status(ProjectStatus::Active))
        .await
        .unwrap();
    assert_eq!(active_acme.len(), 1);
    assert_eq!(active_acme[0].name, "Harbor Depot");

    let paused = projects
        .search(&ProjectFilter::status(ProjectStatus::Paused))
        .await
        .unwrap();
    assert!(paused.is_empty());
}

#[tokio::test]
async fn test_aggregate() {
    let system = SiteSystem::new();

    // 1. Empty set is all zeros
    let empty = system.projects.aggregate().await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(ProjectStatus::ALL.iter().all(|s| empty.count(*s) == 0));
    assert_eq!(empty.total_budget, 0.0);
    assert_eq!(empty.total_spent, 0.0);
    assert_eq!(empty.average_progress, 0.0);

    // 2. Populated set
    let id = system.projects.create(tower_a()).await.unwrap();
    system
        .projects
        .create(ProjectCreate {
            spent: Some(300.0),
            progress: Some(40.0),
            ..ProjectCreate::new("Harbor Depot", "Port", ProjectStatus::Active, 200.0)
        })
        .await
        .unwrap();
    system
        .projects
        .update(
            &id,
            ProjectUpdate {
                progress: Some(10.0),
                ..ProjectUpdate::default()
            },
        )
        .await
        .unwrap();

    let stats = system.projects.aggregate().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.count(ProjectStatus::Planning), 1);
    assert_eq!(stats.count(ProjectStatus::Active), 1);
    assert_eq!(stats.total_budget, 1_000_200.0);
    assert_eq!(stats.total_spent, 300.0);
    assert_eq!(stats.average_progress, 25.0);
    assert_eq!(stats.over_budget, 1);
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let system = SiteSystem::new();
    let hook = system.projects.sync(SyncOptions::manual());
    let missing = ProjectId::from("does-not-exist");

    let via_service = system
        .projects
        .update(&missing, ProjectUpdate::status(ProjectStatus::Cancelled))
        .await;
    assert_eq!(
        via_service,
        Err(ResourceError::NotFound("does-not-exist".into()))
    );

    let via_hook = hook
        .update(&missing, ProjectUpdate::status(ProjectStatus::Cancelled))
        .await;
    assert!(matches!(via_hook, Err(ResourceError::NotFound(_))));
    assert!(hook.state().error.is_some());

    assert!(matches!(
        system.projects.delete(&missing).await,
        Err(ResourceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_negative_budget_is_a_remote_write_error() {
    let system = SiteSystem::new();
    let hook = system.projects.sync(SyncOptions::manual());
    let id = hook.create(tower_a()).await.unwrap();

    let result = hook
        .update(
            &id,
            ProjectUpdate {
                spent: Some(-5.0),
                ..ProjectUpdate::default()
            },
        )
        .await;

    assert!(matches!(result, Err(ResourceError::RemoteWrite(_))));
    let state = hook.state();
    assert_eq!(state.records.len(), 1);
    assert_eq!(state.records[0].spent, 0.0);
    assert_eq!(state.phase(), SyncPhase::Error);

    // A later successful load clears the error
    hook.load().await;
    assert_eq!(hook.state().phase(), SyncPhase::Ready);
}

#[tokio::test]
async fn test_hook_replay_matches_direct_replay() {
    let through_hook = SiteSystem::new();
    let direct = SiteSystem::new();
    let hook = through_hook.projects.sync(SyncOptions::manual());

    // 1. Same script against both
    let a = hook.create(tower_a()).await.unwrap();
    let b = hook
        .create(ProjectCreate::new("Depot", "Port", ProjectStatus::Active, 5.0))
        .await
        .unwrap();
    hook.update(&a, ProjectUpdate::status(ProjectStatus::Paused))
        .await
        .unwrap();
    hook.delete(&b).await.unwrap();

    let a2 = direct.projects.create(tower_a()).await.unwrap();
    let b2 = direct
        .projects
        .create(ProjectCreate::new("Depot", "Port", ProjectStatus::Active, 5.0))
        .await
        .unwrap();
    direct
        .projects
        .update(&a2, ProjectUpdate::status(ProjectStatus::Paused))
        .await
        .unwrap();
    direct.projects.delete(&b2).await.unwrap();

    // 2. Same final state
    let from_hook: Vec<_> = hook.state().records.iter().map(summary).collect();
    let from_store: Vec<_> = direct
        .projects
        .list()
        .await
        .unwrap()
        .iter()
        .map(summary)
        .collect();
    assert_eq!(from_hook, from_store);
    assert_eq!(from_hook[0].2, ProjectStatus::Paused);
}

#[tokio::test]
async fn test_live_view_follows_external_status_change() {
    let system = SiteSystem::new();
    let id = system.projects.create(tower_a()).await.unwrap();

    // 1. Mount live; first snapshot ends Loading
    let hook = system.projects.sync(SyncOptions::live());
    assert!(hook.state().loading);
    let mut rx = hook.watch();
    let primed = wait_for_view(&mut rx, |s| s.loaded).await;
    assert!(!primed.loading);
    assert_eq!(primed.records[0].status, ProjectStatus::Planning);

    // 2. Someone else updates the record
    system
        .projects
        .update(&id, ProjectUpdate::status(ProjectStatus::Active))
        .await
        .unwrap();

    // 3. The view shows it without any hook mutation
    let state = wait_for_view(&mut rx, |s| {
        s.records.first().map(|p| p.status) == Some(ProjectStatus::Active)
    })
    .await;
    assert!(!state.loading);
    assert_eq!(state.records.len(), 1);

    // 4. External delete removes it from the held view
    system.projects.delete(&id).await.unwrap();
    let state = wait_for_view(&mut rx, |s| s.records.is_empty()).await;
    assert_eq!(state.phase(), SyncPhase::Ready);
}

#[tokio::test]
async fn test_concurrent_listeners_get_identical_snapshots() {
    let system = SiteSystem::new();
    let first = system.projects.sync(SyncOptions::live());
    let second = system.projects.sync(SyncOptions::live());
    let (mut rx1, mut rx2) = (first.watch(), second.watch());
    wait_for_view(&mut rx1, |s| s.loaded).await;
    wait_for_view(&mut rx2, |s| s.loaded).await;

    system.projects.create(tower_a()).await.unwrap();

    let a = wait_for_view(&mut rx1, |s| s.records.len() == 1).await;
    let b = wait_for_view(&mut rx2, |s| s.records.len() == 1).await;
    assert_eq!(a.records, b.records);
    assert_eq!(system.store.listener_count("projects").await.unwrap(), 2);
}

#[tokio::test]
async fn test_configured_project_hook_uses_config_options() {
    let config = SyncConfig {
        real_time: true,
        ..SyncConfig::default()
    };
    let system = SiteSystem::with_config(config);
    let hook = system.project_sync();
    assert_eq!(hook.options(), SyncOptions::live());

    let mut rx = hook.watch();
    wait_for_view(&mut rx, |s| s.loaded).await;
    system.projects.create(tower_a()).await.unwrap();

    let state = wait_for_view(&mut rx, |s| s.records.len() == 1).await;
    assert_eq!(state.records[0].name, "Tower A");
    assert_eq!(state.phase(), SyncPhase::Ready);
}

#[tokio::test]
async fn test_unsubscribe_twice_is_harmless() {
    let system = SiteSystem::new();
    let subscription = system.projects.subscribe(|_projects| {}).await.unwrap();
    assert_eq!(system.store.listener_count("projects").await.unwrap(), 1);

    assert!(subscription.unsubscribe());
    assert!(!subscription.unsubscribe());
    assert!(subscription.is_closed());

    let mut listeners = system.store.listener_count("projects").await.unwrap();
    for _ in 0..50 {
        if listeners == 0 {
            break;
        }
        tokio::task::yield_now().await;
        listeners = system.store.listener_count("projects").await.unwrap();
    }
    assert_eq!(listeners, 0);
}

#[tokio::test]
async fn test_stats_hook_loads_on_mount() {
    let system = SiteSystem::new();
    system.projects.create(tower_a()).await.unwrap();

    let stats = system.project_stats();
    let mut rx = stats.watch();
    let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.stats.is_some()))
        .await
        .unwrap()
        .unwrap()
        .clone();

    assert!(!state.loading);
    let snapshot = state.stats.unwrap();
    assert_eq!(snapshot.total, 1);
    assert_eq!(snapshot.count(ProjectStatus::Planning), 1);
}

#[tokio::test]
async fn test_supplier_registry_uses_the_same_machinery() {
    let system = SiteSystem::new();
    let hook = system.supplier_sync();
    let mut rx = hook.watch();
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.loaded))
        .await
        .unwrap()
        .unwrap();

    let id = hook
        .create(SupplierCreate {
            contact: Some("Maria Souza".into()),
            city: Some("Recife".into()),
            ..SupplierCreate::new("Cimento Norte")
        })
        .await
        .unwrap();
    hook.create(SupplierCreate::new("Aço Sul")).await.unwrap();
    assert_eq!(hook.state().records.len(), 2);

    let by_contact = system
        .suppliers
        .search(&SupplierFilter {
            term: Some("maria".into()),
        })
        .await
        .unwrap();
    assert_eq!(by_contact.len(), 1);
    assert_eq!(by_contact[0].city.as_deref(), Some("Recife"));

    hook.update(
        &id,
        SupplierUpdate {
            phone: Some("+55 81 5555-0100".into()),
            ..SupplierUpdate::default()
        },
    )
    .await
    .unwrap();
    let updated = hook
        .state()
        .records
        .into_iter()
        .find(|s| s.id == id)
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("+55 81 5555-0100"));
    assert_eq!(updated.contact.as_deref(), Some("Maria Souza"));

    hook.delete(&id).await.unwrap();
    assert_eq!(hook.state().records.len(), 1);
}

#[tokio::test]
async fn test_shutdown_closes_the_store() {
    let system = SiteSystem::new();
    let projects = system.projects.clone();

    system.shutdown().await.unwrap();

    assert!(matches!(
        projects.list().await,
        Err(ResourceError::RemoteRead(_))
    ));
}
