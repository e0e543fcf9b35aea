//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_forgot_password_page, get_log_in_page, get_log_out,
        get_register_page, post_log_in, register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, export_expenses, get_edit_expense_page,
        get_expense_page, update_expense_endpoint,
    },
    income::{
        create_income_endpoint, delete_income_endpoint, export_income, get_edit_income_page,
        get_income_page, update_income_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    savings::{
        contribute_endpoint, delete_goal_endpoint, export_savings, get_edit_goal_page,
        get_savings_page, update_goal_endpoint,
    },
    transactions::{export_transactions, get_transactions_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::FORGOT_PASSWORD_VIEW,
            get(get_forgot_password_page),
        )
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::SAVINGS_VIEW, get(get_savings_page))
        .route(endpoints::EDIT_SAVINGS_GOAL_VIEW, get(get_edit_goal_page))
        .route(endpoints::SAVINGS_EXPORT, get(export_savings))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::EDIT_INCOME_VIEW, get(get_edit_income_page))
        .route(endpoints::INCOME_EXPORT, get(export_income))
        .route(endpoints::EXPENSES_VIEW, get(get_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::EXPENSES_EXPORT, get(export_expenses))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::TRANSACTIONS_EXPORT, get(export_transactions))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // HTMX requests need the HX-Redirect header for auth redirects to navigate the whole page.
    let protected_api = Router::new()
        .route(endpoints::SAVINGS_API, post(contribute_endpoint))
        .route(
            endpoints::SAVINGS_GOAL,
            put(update_goal_endpoint).delete(delete_goal_endpoint),
        )
        .route(endpoints::INCOME_API, post(create_income_endpoint))
        .route(
            endpoints::INCOME,
            put(update_income_endpoint).delete(delete_income_endpoint),
        )
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    protected_pages
        .merge(protected_api)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
