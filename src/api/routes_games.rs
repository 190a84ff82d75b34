use super::*;

/// Which listing behaviour a request gets. Both profiles share one URL builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ListingProfile {
    /// Release-date and safety filtering, with an unfiltered trending fallback.
    Filtered,
    /// Upstream body relayed as-is.
    Legacy,
}

impl GamesQuery {
    fn into_request(self, today: chrono::NaiveDate, default_page_size: u32) -> ListingRequest {
        let range = dates::resolve_range(self.dates.as_deref(), self.range.as_deref(), today);
        ListingRequest::new(self.page_size.unwrap_or(default_page_size))
            .dates(range)
            .ordering(self.ordering.as_deref().or(self.sort.as_deref()))
            .platforms(self.platform.as_deref())
    }
}

impl LegacyGamesQuery {
    fn into_request(self, today: chrono::NaiveDate, default_page_size: u32) -> ListingRequest {
        let range = dates::legacy_range(self.start.as_deref(), self.end.as_deref(), today);
        ListingRequest::new(default_page_size)
            .dates(range)
            .ordering(self.sort.as_deref())
            .platforms(self.platform.as_deref())
    }
}

pub(super) async fn list_games(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GamesQuery>,
) -> Result<Response, AppError> {
    let request = query.into_request(state.clock.today(), state.rawg.page_size());
    serve_listing(&state, ListingProfile::Filtered, request).await
}

pub(super) async fn list_games_legacy(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LegacyGamesQuery>,
) -> Result<Response, AppError> {
    let request = query.into_request(state.clock.today(), state.rawg.page_size());
    serve_listing(&state, ListingProfile::Legacy, request).await
}

async fn serve_listing(
    state: &AppState,
    profile: ListingProfile,
    request: ListingRequest,
) -> Result<Response, AppError> {
    match profile {
        ListingProfile::Legacy => Ok(Json(state.rawg.fetch_listing(&request).await?).into_response()),
        ListingProfile::Filtered => {
            let today = state.clock.today();
            let games = state.rawg.list_games(&request).await?;
            let upstream_count = games.len();
            let kept = filter::apply(games, today);
            if !kept.is_empty() {
                return Ok(Json(GameListing::new(kept)).into_response());
            }

            info!(upstream_count, "no listing entries passed the filter, using trending fallback");
            let trending = ListingRequest::trending(today, request.page_size);
            let fallback = state.rawg.list_games(&trending).await?;
            Ok(Json(GameListing::new(fallback)).into_response())
        }
    }
}

pub(super) async fn list_releases(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReleasesQuery>,
) -> Result<Json<GameListing>, AppError> {
    let today = state.clock.today();
    let filter_state = FilterState {
        section: Section::parse(query.section.as_deref()),
        time_filter: TimeFilter::parse(query.time_filter.as_deref()),
    };

    let (range, ordering) = match filter_state.section {
        Section::OutNow => (
            DateRange::between(dates::days_before(today, 29), today),
            Some("-released"),
        ),
        Section::ComingSoon => (
            DateRange::between(today, dates::days_after(today, 31)),
            Some("released"),
        ),
        Section::Other => (dates::resolve_range(None, None, today), None),
    };
    let request = ListingRequest::new(state.rawg.page_size())
        .dates(range)
        .ordering(ordering)
        .platforms(query.platform.as_deref());

    let games = filter::apply_safety(state.rawg.list_games(&request).await?);
    let kept = timefilter::apply(games, filter_state, today);
    debug!(?filter_state, count = kept.len(), "releases filtered");
    Ok(Json(GameListing::new(kept)))
}

pub(super) async fn get_game(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GameQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let slug = query
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingParam("slug"))?;

    let detail = state
        .rawg
        .game_detail(slug)
        .await
        .map_err(AppError::relayed)?;
    Ok(Json(detail))
}
