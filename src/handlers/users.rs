use axum::{
    Form,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{found, render};
use crate::{
    AppState,
    auth::{self, CurrentUser},
    error::{AppError, RepoError},
    forms::{self, BoundForm, FormErrors, LoginForm, SignupForm},
    pages::{LoginPage, MessagePage, SignupPage},
    urls::{self, Route},
};

/// Query string of the login page.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NextQuery {
    /// Path to return to after a successful login.
    pub next: Option<String>,
}

/// login_page
///
/// [Public Route] Empty login form, remembering `next`.
#[utoipa::path(
    get,
    path = "/auth/login",
    params(NextQuery),
    responses((status = 200, description = "Login form"))
)]
pub async fn login_page(Query(query): Query<NextQuery>) -> Response {
    render(LoginPage {
        form: BoundForm::unbound(LoginForm {
            next: query.next,
            ..LoginForm::default()
        }),
    })
}

/// login
///
/// [Public Route] Checks credentials, sets the session cookie and redirects to
/// `next` (when it is a local path) or to the news home. Wrong credentials
/// re-render the form with a non-field error.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in"),
        (status = 200, description = "Invalid credentials, form re-rendered")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.clean() {
        return Ok(rerender_login(form, errors));
    }

    let user = state.repo.get_user_by_username(form.username.trim()).await?;
    let Some(user) = user.filter(|u| auth::verify_password(&form.password, &u.password_hash))
    else {
        tracing::info!(username = %form.username, "failed login attempt");
        let mut errors = FormErrors::default();
        errors.add(forms::NON_FIELD_ERRORS, forms::INVALID_LOGIN);
        return Ok(rerender_login(form, errors));
    };

    let token = auth::issue_token(&state.config, user.id)?;
    let target = form
        .next
        .as_deref()
        .filter(|next| urls::is_safe_next(next))
        .map(str::to_string)
        .unwrap_or_else(|| Route::NewsHome.path());
    tracing::info!(user_id = %user.id, "user logged in");

    let mut response = found(target);
    let cookie = auth::session_cookie_header(&state.config, &token);
    if let Ok(value) = header::HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// logout
///
/// [Public Route] Clears the session cookie. Safe to call while logged out.
#[utoipa::path(
    get,
    path = "/auth/logout",
    responses((status = 200, description = "Logged out", body = MessagePage))
)]
pub async fn logout(CurrentUser(user): CurrentUser) -> Response {
    if let Some(user) = &user {
        tracing::info!(user_id = %user.id, "user logged out");
    }
    let page = render(MessagePage {
        message: "Вы вышли из своей учётной записи.".to_string(),
    });
    ([(header::SET_COOKIE, auth::clear_session_cookie_header())], page).into_response()
}

/// signup_page
///
/// [Public Route] Empty registration form.
#[utoipa::path(
    get,
    path = "/auth/signup",
    responses((status = 200, description = "Registration form"))
)]
pub async fn signup_page() -> Response {
    render(SignupPage {
        form: BoundForm::unbound(SignupForm::default()),
    })
}

/// signup
///
/// [Public Route] Registers an account and redirects to the login page.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Registered, redirect to login"),
        (status = 200, description = "Validation failed, form re-rendered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let (username, password) = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => return Ok(rerender_signup(form, errors)),
    };

    let password_hash = auth::hash_password(&password)?;
    match state.repo.create_user(&username, &password_hash).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "user registered");
            Ok(found(Route::Login.path()))
        }
        Err(RepoError::Conflict(_)) => {
            let mut errors = FormErrors::default();
            errors.add("username", forms::USERNAME_TAKEN);
            Ok(rerender_signup(form, errors))
        }
        Err(err) => Err(err.into()),
    }
}

fn rerender_login(form: LoginForm, errors: FormErrors) -> Response {
    render(LoginPage {
        form: BoundForm::with_errors(form, errors),
    })
}

fn rerender_signup(form: SignupForm, errors: FormErrors) -> Response {
    render(SignupPage {
        form: BoundForm::with_errors(form, errors),
    })
}
