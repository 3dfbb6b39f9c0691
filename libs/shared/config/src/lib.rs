use std::env;

use chrono_tz::Tz;
use tracing::warn;

/// Zone used for all scheduling comparisons when CLINIC_TIMEZONE is not set.
const DEFAULT_CLINIC_TIMEZONE: Tz = chrono_tz::America::Mexico_City;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub clinic_timezone: Tz,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL").unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY").unwrap_or_else(|_| {
                warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                String::new()
            }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET").unwrap_or_else(|_| {
                warn!("SUPABASE_JWT_SECRET not set, using empty value");
                String::new()
            }),
            clinic_timezone: Self::clinic_timezone_from_env(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    fn clinic_timezone_from_env() -> Tz {
        match env::var("CLINIC_TIMEZONE") {
            Ok(name) => name.parse().unwrap_or_else(|_| {
                warn!("CLINIC_TIMEZONE '{}' is not a valid IANA zone, using default", name);
                DEFAULT_CLINIC_TIMEZONE
            }),
            Err(_) => DEFAULT_CLINIC_TIMEZONE,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}
