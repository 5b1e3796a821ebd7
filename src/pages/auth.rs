//! Login and registration pages
//!
//! Input is validated locally before any request. A rejected login or
//! registration leaves whatever session already exists untouched.

use super::{PageContext, PageError};
use crate::models::{LoginRequest, RegisterRequest, User};
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub nickname: String,
}

/// Check a registration form: matching passwords, then length, then email
pub fn validate_registration(form: &RegisterForm) -> Result<(), PageError> {
    if form.password != form.confirm_password {
        return Err(PageError::validation("Passwords don't match"));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PageError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if !is_valid_email(&form.email) {
        return Err(PageError::validation("Please enter a valid email address"));
    }
    Ok(())
}

pub struct LoginPage {
    ctx: PageContext,
    error: Option<String>,
    submitting: bool,
}

impl LoginPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            error: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn submit(&mut self, form: &LoginForm) -> Result<User, PageError> {
        self.error = None;
        self.submitting = true;
        let result = self.try_submit(form).await;
        self.submitting = false;

        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }

    async fn try_submit(&self, form: &LoginForm) -> Result<User, PageError> {
        if !is_valid_email(&form.email) {
            return Err(PageError::validation("Please enter a valid email address"));
        }

        let request = LoginRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        let auth = self.ctx.backend.login(&request).await?;
        Ok(self.ctx.session.sign_in(&auth)?)
    }
}

pub struct RegisterPage {
    ctx: PageContext,
    error: Option<String>,
    submitting: bool,
}

impl RegisterPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            error: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn submit(&mut self, form: &RegisterForm) -> Result<User, PageError> {
        self.error = None;
        self.submitting = true;
        let result = self.try_submit(form).await;
        self.submitting = false;

        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }

    async fn try_submit(&self, form: &RegisterForm) -> Result<User, PageError> {
        validate_registration(form)?;

        let nickname = form.nickname.trim();
        let request = RegisterRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            nickname: (!nickname.is_empty()).then(|| nickname.to_string()),
        };
        let auth = self.ctx.backend.register(&request).await?;
        Ok(self.ctx.session.sign_in(&auth)?)
    }
}
