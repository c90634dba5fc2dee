//! Entity routes: one collection path and one item path per family.

use crate::entity::{Brand, Category, Comment, Entity, Label, Person, Role, Stock, Tool};
use crate::handlers::entity::{delete, list, read, save};
use crate::state::AppState;
use axum::{
    routing::{get, MethodRouter},
    Router,
};

/// `GET`/`POST /{path}` plus `item` on `/{path}/:id`.
fn mount<E: Entity>(router: Router<AppState>, item: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(&format!("/{}", E::PATH), get(list::<E>).post(save::<E>))
        .route(&format!("/{}/:id", E::PATH), item)
}

/// Routes for every family, to be nested under `API_PREFIX`.
pub fn entity_routes(state: AppState) -> Router {
    let router = Router::new();
    let router = mount::<Brand>(router, get(read::<Brand>));
    let router = mount::<Category>(router, get(read::<Category>));
    let router = mount::<Label>(router, get(read::<Label>));
    let router = mount::<Role>(router, get(read::<Role>));
    let router = mount::<Person>(router, get(read::<Person>));
    let router = mount::<Tool>(router, get(read::<Tool>));
    let router = mount::<Stock>(router, get(read::<Stock>));
    let router = mount::<Comment>(router, get(read::<Comment>).delete(delete::<Comment>));
    router.with_state(state)
}
