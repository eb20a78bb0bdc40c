use fusion_recipe::app::{
    Activity, Application, ApplicationComposer, Authentication, CallbackRepository, Connection, RestRepositorySpec,
    RestResourceSpec,
};
use fusion_recipe::context::Scope;
use fusion_recipe::framework::{FrameworkError, MockRepository, Stencil};
use fusion_recipe::lifecycle::{FusionConfig, Launcher};
use fusion_recipe::model::{Movie, Profile};
use fusion_recipe::runtime::{FragmentState, HeadlessRuntime, Runtime};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct MoviesApp;

impl ApplicationComposer for MoviesApp {
    fn compose(&self, _scope: &Scope) -> Application {
        Application::new("Movies")
            .with_activity(|_: &Scope| Activity::new("Overview").with_repository(RestRepositorySpec::<Movie>::new("/movies")))
            .with_activity(|_: &Scope| Activity::new("Profile").with_resource(RestResourceSpec::<Profile>::new("/profile")))
            .with_activity(|_: &Scope| {
                Activity::new("Archive")
                    .hidden()
                    .with_repository(RestRepositorySpec::<Movie>::new("/archive"))
            })
    }
}

fn config_for(server: &MockServer) -> FusionConfig {
    let addr = server.address();
    FusionConfig {
        connection: Some(Connection::new("http", addr.ip().to_string(), addr.port())),
        ..FusionConfig::default()
    }
}

/// Full end-to-end run: launcher → headless backend → REST stencils → wiremock.
#[tokio::test]
async fn headless_launch_prefetches_visible_fragments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ID": "1", "Title": "Alien"},
            {"ID": "2", "Title": "Heat"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let launcher = Launcher::new(config_for(&server));
    let reports = launcher.headless_reports();
    launcher.launch(&MoviesApp).await.unwrap();

    let reports = reports.snapshot();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].activity, "Overview");
    assert_eq!(reports[0].entity_type, "Movie");
    assert_eq!(reports[0].state, FragmentState::Loaded { items: 2 });
    assert_eq!(reports[1].entity_type, "Profile");
    assert_eq!(reports[1].state, FragmentState::LoginRequired);
}

#[tokio::test]
async fn unknown_backend_fails_before_composition() {
    struct Counting(Arc<AtomicUsize>);

    impl ApplicationComposer for Counting {
        fn compose(&self, _scope: &Scope) -> Application {
            self.0.fetch_add(1, Ordering::SeqCst);
            Application::new("never")
        }
    }

    let composed = Arc::new(AtomicUsize::new(0));
    let launcher = Launcher::new(FusionConfig {
        backend: "wasm/js".to_string(),
        ..FusionConfig::default()
    });

    let err = launcher.launch(&Counting(composed.clone())).await.unwrap_err();
    assert!(matches!(err, FrameworkError::BackendNotFound(ref name) if name == "wasm/js"));
    assert_eq!(composed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn interactive_authentication_aborts_start() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let launcher = Launcher::new(FusionConfig {
        authentication: Some(Authentication::Interactive),
        ..config_for(&server)
    });
    let reports = launcher.headless_reports();

    let err = launcher.launch(&MoviesApp).await.unwrap_err();
    assert!(matches!(err, FrameworkError::UnsupportedAuthentication(_)));
    assert!(err.is_programming_error());
    assert!(reports.snapshot().is_empty(), "no fragment may load after a programming error");
}

#[tokio::test]
async fn config_title_and_custom_backends() {
    struct Capture(Arc<std::sync::Mutex<Option<String>>>);

    #[async_trait::async_trait]
    impl Runtime for Capture {
        async fn start(&mut self, composer: &dyn ApplicationComposer, scope: Scope) -> Result<(), FrameworkError> {
            let application = composer.compose(&scope);
            *self.0.lock().unwrap() = Some(application.title);
            Ok(())
        }
    }

    let seen = Arc::new(std::sync::Mutex::new(None));
    let launcher = Launcher::new(FusionConfig {
        backend: "capture".to_string(),
        title: Some("Renamed".to_string()),
        ..FusionConfig::default()
    });
    let sink = seen.clone();
    launcher
        .registry()
        .register("capture", move || Ok(Box::new(Capture(sink.clone())) as Box<dyn Runtime>));
    assert_eq!(launcher.registry().names(), vec!["capture".to_string(), HeadlessRuntime::NAME.to_string()]);

    launcher.launch(&MoviesApp).await.unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("Renamed"));
}

/// Headless runtime with an in-memory repository and a mocked one side by side.
#[tokio::test]
async fn headless_runtime_drives_any_repository_spec() {
    let mut mock = MockRepository::<Movie>::new();
    mock.expect_list().return_ok(vec![Movie::new("1", "Alien")]);

    struct MockSpec(MockRepository<Movie>);

    impl fusion_recipe::app::RepositorySpec for MockSpec {
        fn new_stencil(
            &self,
            _scope: &Scope,
        ) -> Result<Arc<dyn fusion_recipe::framework::RepositoryStencil>, FrameworkError> {
            Ok(Arc::new(Stencil::new(self.0.clone())))
        }

        fn default_value(&self) -> fusion_recipe::framework::Opaque {
            Box::new(Movie::default())
        }
    }

    let spec = MockSpec(mock.clone());
    let local = CallbackRepository::<Movie>::new().on_list(|| Ok(Vec::new()));
    let composer = move |_: &Scope| {
        let spec = MockSpec(spec.0.clone());
        let local = local.clone();
        Application::new("Mixed").with_activity(move |_: &Scope| {
            Activity::new("Both")
                .with_repository(MockSpec(spec.0.clone()))
                .with_repository(local.clone())
        })
    };

    let reports = fusion_recipe::runtime::Reports::default();
    HeadlessRuntime::new(reports.clone()).start(&composer, Scope::new()).await.unwrap();

    let states: Vec<_> = reports.snapshot().into_iter().map(|r| r.state).collect();
    assert_eq!(
        states,
        vec![FragmentState::Loaded { items: 1 }, FragmentState::Loaded { items: 0 }]
    );
    mock.verify();
}
