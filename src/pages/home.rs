//! Landing page: greeting, shortcuts and logout

use super::{PageContext, PageError};
use crate::models::User;
use crate::router::Route;

/// Landing page: greeting, shortcuts and logout
pub struct HomePage {
    ctx: PageContext,
}

impl HomePage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub fn user(&self) -> Option<User> {
        self.ctx.session.user()
    }

    pub fn is_logged_in(&self) -> bool {
        self.ctx.session.is_authenticated()
    }

    /// Shortcut tiles shown under the greeting
    pub fn shortcuts(&self) -> &'static [Route] {
        if self.is_logged_in() {
            &[Route::Record, Route::Stats, Route::Analysis, Route::History]
        } else {
            &[Route::Login, Route::Register]
        }
    }

    /// Clear the session and land back on Home
    pub fn logout(&mut self) -> Result<Route, PageError> {
        self.ctx.session.sign_out()?;
        Ok(Route::Home)
    }
}
