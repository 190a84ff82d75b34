use super::*;

pub(super) async fn health() -> &'static str {
    "ok"
}

pub(super) async fn get_sitemap(State(state): State<AppState>) -> Result<Response, AppError> {
    let today = state.clock.today();
    let request = ListingRequest::new(state.rawg.page_size()).ordering(Some("-added"));
    let games = filter::apply_safety(state.rawg.list_games(&request).await?);

    let lastmod = dates::iso(today);
    let entries = crate::sitemap::entries(&state.site_url, games.iter().map(|g| g.name()), &lastmod);
    info!(urls = entries.len(), "sitemap generated");

    Ok((
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        crate::sitemap::render(&entries),
    )
        .into_response())
}

pub(super) async fn search_igdb(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IgdbQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingParam("search"))?;

    let results = state
        .igdb
        .search_games(search, query.limit, state.clock.now())
        .await?;
    Ok(Json(results))
}

/// Reports whether a RAWG key is configured without revealing it.
pub(super) async fn test_env(State(state): State<AppState>) -> Json<EnvStatus> {
    Json(match state.rawg.key_len() {
        Some(length) => EnvStatus {
            status: "ok",
            length,
        },
        None => EnvStatus {
            status: "missing",
            length: 0,
        },
    })
}
