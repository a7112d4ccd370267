//! End-to-end soft navigation against a headless page and a scripted origin.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use danis_navigation::{
    Anchor, Capabilities, ContentEvent, Document, DomError, HeadlessPage, MetaTag,
    NavigationConfig, NavigationError, NavigationOutcome, NavigationState, PageEvent, RebindHook,
    SessionHistory, SharedWindow, SoftNavigator, SwapMode, TransitionPhase, TransitionTarget,
    Window,
};
use danis_test_helpers::{landmark_page, ScriptedNetwork};
use parking_lot::Mutex;
use url::Url;

const ORIGIN: &str = "https://example.com";

fn home_window() -> SharedWindow<HeadlessPage> {
    let url = Url::parse(ORIGIN).unwrap().join("/").unwrap();
    Arc::new(Mutex::new(HeadlessPage::new(
        url,
        landmark_page("Home", "<p>home</p>"),
    )))
}

fn site() -> Arc<ScriptedNetwork> {
    let network = Arc::new(ScriptedNetwork::new(ORIGIN));
    network.page("/", &landmark_page("Home", "<p>home</p>"));
    network.page(
        "/gallery.html",
        &landmark_page("Gallery", "<ul><li>photo</li></ul>"),
    );
    network
}

fn engine(
    window: &SharedWindow<HeadlessPage>,
    network: &Arc<ScriptedNetwork>,
) -> SoftNavigator<HeadlessPage, Arc<ScriptedNetwork>> {
    SoftNavigator::install(
        NavigationConfig::default(),
        Arc::clone(window),
        Arc::clone(network),
    )
    .unwrap()
}

fn position(journal: &[PageEvent], event: &PageEvent) -> usize {
    journal
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("{event:?} missing from {journal:?}"))
}

/// Fade out, fetch, landmark swap, history push, fade in: in that order and
/// taking at least two fades plus the fetch latency.
#[tokio::test(start_paused = true)]
async fn click_runs_the_full_sequence_in_order() {
    let window = home_window();
    let network = site();
    network.set_latency(Duration::from_millis(50));
    let navigator = engine(&window, &network);
    window.lock().clear_journal();

    let mut phases = navigator.watch_phase();
    let observer = async {
        phases
            .wait_for(|p| *p == TransitionPhase::Swapping)
            .await
            .unwrap();
        let page = window.lock();
        assert_eq!(page.opacity(), 0.0, "content must be hidden before the swap");
        assert!(!page.journal().contains(&PageEvent::LandmarkReplaced));
    };

    let gallery = Anchor::new("/gallery.html");
    let start = tokio::time::Instant::now();
    let (outcome, ()) = tokio::join!(navigator.click(&gallery), observer);

    assert_eq!(outcome, NavigationOutcome::Completed(SwapMode::Landmark));
    assert!(start.elapsed() >= Duration::from_millis(2 * 300 + 50));
    assert_eq!(network.request_count("/gallery.html"), 1);

    let page = window.lock();
    let journal = page.journal();
    let faded_out = position(journal, &PageEvent::Opacity(0.0));
    let swapped = position(journal, &PageEvent::LandmarkReplaced);
    let pushed = position(journal, &PageEvent::Pushed("/gallery.html".to_string()));
    let faded_in = position(journal, &PageEvent::Opacity(1.0));
    assert!(faded_out < swapped && swapped < pushed && pushed < faded_in);
    assert_eq!(
        journal.first(),
        Some(&PageEvent::Transition(Some(
            "opacity 300ms ease-out".to_string()
        )))
    );
    assert_eq!(journal.last(), Some(&PageEvent::Transition(None)));

    assert_eq!(page.title(), "Gallery");
    assert_eq!(
        page.inner_html("main").as_deref(),
        Some("<ul><li>photo</li></ul>")
    );
    assert_eq!(page.location().as_str(), "https://example.com/gallery.html");
    assert_eq!(
        page.meta_content(MetaTag::OgTitle).as_deref(),
        Some("Gallery")
    );
}

/// Back at idle the page is fully visible with no transition style.
#[tokio::test(start_paused = true)]
async fn idle_page_is_fully_visible() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);

    navigator.click(&Anchor::new("/gallery.html")).await;

    assert_eq!(navigator.phase(), TransitionPhase::Idle);
    let page = window.lock();
    assert_eq!(page.opacity(), 1.0);
    assert_eq!(page.transition(), None);
}

/// A failed fetch becomes a hard navigation without touching the content.
#[tokio::test(start_paused = true)]
async fn missing_page_falls_back_to_hard_navigation() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);
    window.lock().clear_journal();

    let outcome = navigator.click(&Anchor::new("/missing.html")).await;

    assert_eq!(outcome, NavigationOutcome::HardNavigation);
    assert!(navigator.has_departed());
    assert_eq!(navigator.phase(), TransitionPhase::Idle);
    let page = window.lock();
    assert_eq!(
        page.assigned().map(Url::as_str),
        Some("https://example.com/missing.html")
    );
    assert!(!page.journal().contains(&PageEvent::LandmarkReplaced));
    assert_eq!(page.inner_html("main").as_deref(), Some("<p>home</p>"));
    assert_eq!(page.opacity(), 1.0);
    assert_eq!(page.history().len(), 1, "no history entry on failure");
}

/// An unreachable origin is handled like an error status.
#[tokio::test(start_paused = true)]
async fn network_failure_falls_back_and_later_clicks_go_native() {
    let window = home_window();
    let network = site();
    network.set_offline(true);
    let navigator = engine(&window, &network);

    let outcome = navigator.click(&Anchor::new("/gallery.html")).await;
    assert_eq!(outcome, NavigationOutcome::HardNavigation);

    let again = navigator.click(&Anchor::new("/gallery.html")).await;
    assert_eq!(again, NavigationOutcome::Native);
    assert!(!navigator.intercepts(&Anchor::new("/gallery.html")));
}

/// A page whose metadata tags cannot be written, so a swap fails after the
/// title and landmark are already replaced.
#[derive(Debug)]
struct ReadOnlyMeta(HeadlessPage);

impl Document for ReadOnlyMeta {
    fn title(&self) -> String {
        self.0.title()
    }

    fn set_title(&mut self, title: &str) -> Result<(), DomError> {
        self.0.set_title(title)
    }

    fn has_landmark(&self, landmark: &str) -> bool {
        self.0.has_landmark(landmark)
    }

    fn replace_landmark(&mut self, landmark: &str, html: &str) -> Result<(), DomError> {
        self.0.replace_landmark(landmark, html)
    }

    fn replace_body(&mut self, html: &str) -> Result<(), DomError> {
        self.0.replace_body(html)
    }

    fn meta_content(&self, tag: MetaTag) -> Option<String> {
        self.0.meta_content(tag)
    }

    fn set_meta_content(&mut self, _tag: MetaTag, _content: &str) -> Result<(), DomError> {
        Err(DomError::NotAnElement)
    }

    fn scroll_to_top(&mut self) {
        self.0.scroll_to_top();
    }
}

impl TransitionTarget for ReadOnlyMeta {
    fn set_transition(&mut self, transition: Option<&str>) {
        self.0.set_transition(transition);
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.0.set_opacity(opacity);
    }

    fn opacity(&self) -> f32 {
        self.0.opacity()
    }
}

impl SessionHistory for ReadOnlyMeta {
    fn location(&self) -> Url {
        self.0.location()
    }

    fn state(&self) -> Option<NavigationState> {
        self.0.state()
    }

    fn push_state(&mut self, state: NavigationState, url: &str) {
        self.0.push_state(state, url);
    }

    fn replace_state(&mut self, state: NavigationState, url: &str) {
        self.0.replace_state(state, url);
    }
}

impl Window for ReadOnlyMeta {
    fn capabilities(&self) -> Capabilities {
        self.0.capabilities()
    }

    fn assign(&mut self, url: &str) {
        self.0.assign(url);
    }
}

/// A document error halfway through the swap abandons the page for a full
/// load: no history entry, no announcement, and the page left at rest.
#[tokio::test(start_paused = true)]
async fn swap_failure_falls_back_to_hard_navigation() {
    let url = Url::parse(ORIGIN).unwrap().join("/").unwrap();
    let page = ReadOnlyMeta(HeadlessPage::new(url, landmark_page("Home", "<p>home</p>")));
    let window = Arc::new(Mutex::new(page));
    let network = site();
    let navigator = SoftNavigator::install(
        NavigationConfig::default(),
        Arc::clone(&window),
        Arc::clone(&network),
    )
    .unwrap();
    let mut events = navigator.subscribe();
    let rebinds = Arc::new(AtomicUsize::new(0));
    {
        let rebinds = Arc::clone(&rebinds);
        navigator.register_hook(RebindHook::LazyLoading, move || {
            rebinds.fetch_add(1, Ordering::SeqCst);
        });
    }

    let outcome = navigator.click(&Anchor::new("/gallery.html")).await;

    assert_eq!(outcome, NavigationOutcome::HardNavigation);
    assert!(navigator.has_departed());
    assert_eq!(navigator.phase(), TransitionPhase::Idle);
    let window = window.lock();
    let page = &window.0;
    assert!(page.journal().contains(&PageEvent::LandmarkReplaced));
    assert_eq!(
        page.assigned().map(Url::as_str),
        Some("https://example.com/gallery.html")
    );
    assert_eq!(page.opacity(), 1.0);
    assert_eq!(page.transition(), None);
    assert_eq!(page.history().len(), 1);
    assert!(!page
        .journal()
        .iter()
        .any(|e| matches!(e, PageEvent::Pushed(_))));
    assert!(events.try_recv().is_err());
    assert_eq!(rebinds.load(Ordering::SeqCst), 0);
}

/// Dropping a navigation mid-fade leaves the page visible, the engine idle
/// and the next click free to run.
#[tokio::test(start_paused = true)]
async fn abandoned_navigation_returns_to_rest() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);
    let gallery = Anchor::new("/gallery.html");

    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), navigator.click(&gallery)).await;

    assert!(abandoned.is_err(), "still fading out after 100ms");
    assert_eq!(navigator.phase(), TransitionPhase::Idle);
    {
        let page = window.lock();
        assert_eq!(page.opacity(), 1.0);
        assert_eq!(page.transition(), None);
        assert_eq!(page.history().len(), 1);
    }
    assert_eq!(
        navigator.click(&gallery).await,
        NavigationOutcome::Completed(SwapMode::Landmark)
    );
}

/// Back after one soft navigation re-renders the first page without pushing.
#[tokio::test(start_paused = true)]
async fn back_replays_without_pushing() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);

    navigator.click(&Anchor::new("/gallery.html")).await;
    let state = window.lock().go_back().unwrap();
    assert_eq!(
        state.as_ref().map(|s| s.url.as_str()),
        Some("https://example.com/")
    );
    window.lock().clear_journal();

    let outcome = navigator.pop_state(state).await;

    assert_eq!(outcome, NavigationOutcome::Completed(SwapMode::Landmark));
    let page = window.lock();
    assert_eq!(page.inner_html("main").as_deref(), Some("<p>home</p>"));
    assert_eq!(page.title(), "Home");
    assert!(!page
        .journal()
        .iter()
        .any(|e| matches!(e, PageEvent::Pushed(_) | PageEvent::Replaced(_))));
    assert_eq!(page.history().len(), 2);
    assert_eq!(page.history().index(), 0);
    assert_eq!(network.request_count("/"), 1);
}

/// Forward after back replays the later entry.
#[tokio::test(start_paused = true)]
async fn forward_replays_the_later_entry() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);

    navigator.click(&Anchor::new("/gallery.html")).await;
    let back = window.lock().go_back().unwrap();
    navigator.pop_state(back).await;
    let forward = window.lock().go_forward().unwrap();
    let outcome = navigator.pop_state(forward).await;

    assert_eq!(outcome, NavigationOutcome::Completed(SwapMode::Landmark));
    assert_eq!(
        window.lock().inner_html("main").as_deref(),
        Some("<ul><li>photo</li></ul>")
    );
    assert_eq!(network.request_count("/gallery.html"), 2);
}

/// A popstate the engine did not create is left to the browser.
#[tokio::test(start_paused = true)]
async fn foreign_popstate_is_ignored() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);

    assert_eq!(navigator.pop_state(None).await, NavigationOutcome::Ignored);
    assert!(network.requests().is_empty());
}

/// A second click during a transition is dropped.
#[tokio::test(start_paused = true)]
async fn click_during_flight_is_busy() {
    let window = home_window();
    let network = site();
    network.page("/about.html", &landmark_page("About", "<p>about</p>"));
    network.set_latency(Duration::from_millis(100));
    let navigator = engine(&window, &network);

    let gallery = Anchor::new("/gallery.html");
    let about = Anchor::new("/about.html");
    let (first, second) = tokio::join!(navigator.click(&gallery), navigator.click(&about));

    assert_eq!(first, NavigationOutcome::Completed(SwapMode::Landmark));
    assert_eq!(second, NavigationOutcome::Busy);
    assert_eq!(network.request_count("/about.html"), 0);
    assert_eq!(window.lock().title(), "Gallery");
}

/// Programmatic navigations queue instead of being dropped.
#[tokio::test(start_paused = true)]
async fn navigate_waits_for_the_flight_in_progress() {
    let window = home_window();
    let network = site();
    network.page("/about.html", &landmark_page("About", "<p>about</p>"));
    let navigator = engine(&window, &network);

    let gallery = Anchor::new("/gallery.html");
    let (first, second) = tokio::join!(
        navigator.click(&gallery),
        navigator.navigate("/about.html")
    );

    assert_eq!(first, NavigationOutcome::Completed(SwapMode::Landmark));
    assert_eq!(second, NavigationOutcome::Completed(SwapMode::Landmark));
    let page = window.lock();
    assert_eq!(page.title(), "About");
    assert_eq!(page.history().len(), 3);
}

/// Excluded and cross-origin links are never intercepted.
#[tokio::test(start_paused = true)]
async fn filtered_links_stay_native() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);

    for anchor in [
        Anchor::new("/images/cover.jpg"),
        Anchor::new("https://elsewhere.example/"),
        Anchor::new("#top"),
        Anchor::new("mailto:hello@example.com"),
        Anchor::new("/gallery.html").with_target("_blank"),
        Anchor::new("/gallery.html").with_attribute("data-no-transition"),
    ] {
        assert!(!navigator.intercepts(&anchor), "{anchor:?}");
        assert_eq!(navigator.click(&anchor).await, NavigationOutcome::Native);
    }
    assert!(network.requests().is_empty());
}

/// A destination without the landmark replaces the whole body.
#[tokio::test(start_paused = true)]
async fn page_without_landmark_replaces_the_body() {
    let window = home_window();
    let network = site();
    network.page(
        "/plain.html",
        "<html><head><title>Plain</title></head><body><article>plain</article></body></html>",
    );
    let navigator = engine(&window, &network);

    let outcome = navigator.click(&Anchor::new("/plain.html")).await;

    assert_eq!(outcome, NavigationOutcome::Completed(SwapMode::WholeBody));
    let page = window.lock();
    assert!(page.journal().contains(&PageEvent::BodyReplaced));
    assert_eq!(
        page.inner_html("body").as_deref(),
        Some("<article>plain</article>")
    );
    assert_eq!(page.title(), "Plain");
}

/// Metadata absent from the destination keeps its old value.
#[tokio::test(start_paused = true)]
async fn metadata_is_never_cleared() {
    let window = home_window();
    let network = site();
    network.page(
        "/sparse.html",
        "<html><head><title>Sparse</title>\
         <meta name=\"description\" content=\"Sparse description\"></head>\
         <body><main><p>sparse</p></main></body></html>",
    );
    let navigator = engine(&window, &network);

    navigator.click(&Anchor::new("/sparse.html")).await;

    let page = window.lock();
    assert_eq!(
        page.meta_content(MetaTag::Description).as_deref(),
        Some("Sparse description")
    );
    assert_eq!(page.meta_content(MetaTag::OgTitle).as_deref(), Some("Home"));
    assert_eq!(
        page.meta_content(MetaTag::OgImage).as_deref(),
        Some("https://example.com/home.jpg")
    );
}

/// Every completed swap announces the event and runs the hooks once.
#[tokio::test(start_paused = true)]
async fn swaps_are_announced() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);
    let mut events = navigator.subscribe();
    let lightbox = Arc::new(AtomicUsize::new(0));
    {
        let lightbox = Arc::clone(&lightbox);
        navigator.register_hook(RebindHook::Lightbox, move || {
            lightbox.fetch_add(1, Ordering::SeqCst);
        });
    }

    navigator.click(&Anchor::new("/gallery.html")).await;
    navigator.navigate("/").await;

    assert_eq!(lightbox.load(Ordering::SeqCst), 2);
    assert_eq!(
        events.try_recv().unwrap(),
        ContentEvent::SoftNavigationComplete
    );
    assert_eq!(
        events.try_recv().unwrap(),
        ContentEvent::SoftNavigationComplete
    );
    assert!(events.try_recv().is_err());
}

/// Failed navigations announce nothing.
#[tokio::test(start_paused = true)]
async fn failures_are_not_announced() {
    let window = home_window();
    let network = site();
    let navigator = engine(&window, &network);
    let mut events = navigator.subscribe();

    navigator.click(&Anchor::new("/missing.html")).await;

    assert!(events.try_recv().is_err());
}

/// Installing records the initial entry so the first page can be returned to.
#[test]
fn install_stamps_the_initial_entry() {
    let window = home_window();
    let network = site();
    let _navigator = engine(&window, &network);

    let page = window.lock();
    assert_eq!(
        page.state().map(|s| s.url),
        Some("https://example.com/".to_string())
    );
    assert_eq!(
        page.journal(),
        &[PageEvent::Replaced("https://example.com/".to_string())]
    );
}

/// Without fetch or the History API the engine stays out of the way.
#[test]
fn unsupported_window_is_rejected() {
    let url = Url::parse("https://example.com/").unwrap();
    let page = HeadlessPage::new(url, landmark_page("Home", "")).with_capabilities(Capabilities {
        fetch: true,
        history: false,
    });
    let window = Arc::new(Mutex::new(page));

    let result = SoftNavigator::install(NavigationConfig::default(), Arc::clone(&window), site());

    assert!(matches!(result, Err(NavigationError::Unsupported(_))));
    assert!(window.lock().journal().is_empty());
}
