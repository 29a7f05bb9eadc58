//! Sign-in, registration and session commands.

use anyhow::{bail, Context as _, Result};
use chrono::{TimeZone, Utc};
use dialoguer::{Input, Password};
use storefront_auth::{validate, Credentials, RegisterRequest, User};

use super::{LoginArgs, RegisterArgs, WhoamiArgs};
use crate::context::Context;

pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let email = validate::normalize_email(&args.email);
    let password = Password::new().with_prompt("Password").interact()?;
    validate::login(&email, &password).map_err(|errors| anyhow::anyhow!("{errors}"))?;

    let spinner = ctx.output.spinner("Signing in...");
    let response = ctx.auth_client()?.login(&Credentials { email, password }).await;
    spinner.finish_and_clear();
    let response = match response {
        Ok(response) => response,
        Err(e) if e.is_unauthorized() => bail!("Invalid email or password"),
        Err(e) => return Err(e).context("Sign-in failed"),
    };

    let mut session = ctx.session()?;
    session.store(&response)?;
    greet(&response.user, ctx);
    Ok(())
}

pub async fn register(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => Input::new().with_prompt("Name").interact_text()?,
    };
    let email = match args.email {
        Some(email) => email,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    if let Err(errors) = validate::registration(&name, &email, &password) {
        for (field, message) in errors.fields() {
            ctx.output.error(&format!("{field}: {message}"));
        }
        bail!("Registration form has {} error(s)", errors.len());
    }

    let request = RegisterRequest {
        name: name.trim().to_string(),
        email: validate::normalize_email(&email),
        password,
    };
    let spinner = ctx.output.spinner("Creating account...");
    let response = ctx.auth_client()?.register(&request).await;
    spinner.finish_and_clear();
    let response = match response {
        Ok(response) => response,
        Err(e) if e.status() == Some(409) => bail!("An account with this email already exists"),
        Err(e) => return Err(e).context("Registration failed"),
    };

    let mut session = ctx.session()?;
    session.store(&response)?;
    greet(&response.user, ctx);
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    let Some(token) = session.token().map(str::to_string) else {
        session.clear()?;
        ctx.output.info("Not signed in.");
        return Ok(());
    };

    if let Err(e) = ctx.auth_client()?.logout(&token).await {
        tracing::warn!(error = %e, "server-side logout failed");
        ctx.output.debug(&format!("server-side logout failed: {e}"));
    }
    session.clear()?;
    ctx.output.success("Signed out");
    Ok(())
}

pub async fn whoami(args: WhoamiArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    let Some(token) = session.token().map(str::to_string) else {
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::Value::Null);
        } else {
            ctx.output.info("Not signed in.");
        }
        return Ok(());
    };

    if args.remote {
        match ctx.auth_client()?.me(&token).await {
            Ok(user) => session.update_user(user)?,
            Err(e) if e.is_unauthorized() => {
                session.clear()?;
                bail!("Session is no longer valid; please sign in again");
            }
            Err(e) => return Err(e).context("Could not reach the account service"),
        }
    }

    let Some(user) = session.user() else {
        bail!("Session is missing its user profile");
    };
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "user": user,
            "permissions": session.permissions(),
            "tokenExpiry": session.token_expiry(),
        }));
        return Ok(());
    }

    ctx.output.header("Signed in");
    ctx.output.kv("Name", &user.name);
    ctx.output.kv("Email", &user.email);
    ctx.output.kv("Role", user.role.as_str());
    let permissions: Vec<&str> = session.permissions().iter().map(|p| p.as_str()).collect();
    ctx.output.kv("Permissions", &permissions.join(", "));
    if let Some(expiry) = session.token_expiry().and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
        ctx.output.kv("Expires", &expiry.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    Ok(())
}

fn greet(user: &User, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(user);
    } else {
        ctx.output
            .success(&format!("Signed in as {} <{}> ({})", user.name, user.email, user.role));
    }
}
