use crate::error::AppError;
use crate::models::ProductDetails;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use types::ids::ProductId;
use types::product::Product;
use types::query::{ListingParams, ListingQuery};

pub async fn list_products(
    State(state): State<AppState>,
    Path(category): Path<String>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    // 1. Validate before touching upstream
    let Query(params) = params?;
    let query = ListingQuery::parse(&params)?;

    // 2. Fan out, merge, sort, paginate
    let page = state.aggregator.list(&category, &query).await?;

    tracing::debug!(
        %category,
        returned = page.len(),
        page = query.page.get(),
        "listing served"
    );
    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path((category, product_id)): Path<(String, String)>,
) -> Result<Json<ProductDetails>, AppError> {
    let product = state
        .lookup
        .find(&category, &ProductId::new(product_id))
        .await?;

    Ok(Json(product))
}
