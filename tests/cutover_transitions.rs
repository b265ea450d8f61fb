// ABOUTME: Tests for cutover state transitions.
// ABOUTME: Validates transition signatures and the data each state carries.

mod support;

use blue_green::deploy::{ApplicationRepo, Cutover, Staged};
use blue_green::types::{AppName, Generation, Route};
use support::fake_platform::FakePlatform;

fn staged() -> Cutover<Staged> {
    Cutover::new(
        AppName::new("shop").unwrap(),
        "shop-g3",
        Generation::new(2).unwrap(),
        "www",
    )
}

/// Test: The full transition chain compiles with correct types.
#[test]
fn transition_chain_compiles() {
    use blue_green::channel::CommandChannel;
    use blue_green::deploy::{DeployError, Released, RouteMapped, Swapped};
    use nonempty::NonEmpty;

    // This function is never called, but it must compile.
    // If any type signature is wrong, this will fail to compile.
    #[allow(dead_code)]
    async fn check_signatures<C: CommandChannel>(repo: &ApplicationRepo<C>) {
        let c1: Cutover<Staged> = staged();

        // Staged -> RouteMapped
        let c2: Result<Cutover<RouteMapped>, DeployError> = c1.map_route(repo).await;

        // RouteMapped -> Swapped
        let c3: Result<Cutover<Swapped>, DeployError> = c2.unwrap().swap_names(repo).await;

        // Swapped -> Released (previous state returned on failure)
        let c4: Result<Cutover<Released>, (Cutover<Swapped>, DeployError)> =
            c3.unwrap().release_archive(repo).await;

        // Released - terminal state
        let _routes: NonEmpty<Route> = c4.unwrap().finish();
    }
}

#[test]
fn staged_cutover_names() {
    let cutover = staged();

    assert_eq!(cutover.app().as_str(), "shop");
    assert_eq!(cutover.incoming(), "shop-g3");
    assert_eq!(cutover.archive(), Generation::new(2).unwrap());
    assert_eq!(cutover.archive_name(), "shop-g2");
    assert_eq!(cutover.host(), "www");
}

#[tokio::test]
async fn routes_travel_through_every_state() {
    let platform = FakePlatform::new()
        .with_app("shop", vec![Route::new("www", "a.com")])
        .with_app("shop-g3", vec![]);
    let repo = ApplicationRepo::new(platform);

    let mapped = staged().map_route(&repo).await.unwrap();
    assert_eq!(mapped.routes().first(), &Route::new("www", "a.com"));

    let swapped = mapped.swap_names(&repo).await.unwrap();
    assert_eq!(repo.channel().apps(), vec!["shop", "shop-g2"]);

    let released = swapped.release_archive(&repo).await.unwrap();
    assert_eq!(released.archive_name(), "shop-g2");
    assert_eq!(released.finish().len(), 1);
    assert!(repo.channel().routes_of("shop-g2").unwrap().is_empty());
}

#[tokio::test]
async fn failed_route_mapping_leaves_names_alone() {
    let platform = FakePlatform::new()
        .with_app("shop", vec![Route::new("www", "a.com")])
        .with_app("shop-g3", vec![]);
    platform.fail_on("map-route", None, "route quota exceeded");
    let repo = ApplicationRepo::new(platform);

    let err = staged().map_route(&repo).await.unwrap_err();

    assert_eq!(err.to_string(), "route quota exceeded");
    assert_eq!(repo.channel().apps(), vec!["shop", "shop-g3"]);
}

#[tokio::test]
async fn failed_release_returns_the_swapped_state() {
    let platform = FakePlatform::new()
        .with_app("shop", vec![Route::new("www", "a.com")])
        .with_app("shop-g3", vec![]);
    platform.fail_on("unmap-route", None, "unmap refused");
    let repo = ApplicationRepo::new(platform);

    let swapped = staged()
        .map_route(&repo)
        .await
        .unwrap()
        .swap_names(&repo)
        .await
        .unwrap();
    let (swapped, err) = swapped.release_archive(&repo).await.unwrap_err();

    assert_eq!(err.to_string(), "unmap refused");
    assert_eq!(swapped.routes().first(), &Route::new("www", "a.com"));
}
