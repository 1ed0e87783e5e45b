//! Backend endpoint table.

pub mod auth {
    pub const SEND_OTP: &str = "/send-otp";
    pub const VERIFY_OTP: &str = "/verify-otp";
    pub const LOGIN: &str = "/api/auth/login";
    pub const LOGOUT: &str = "/api/auth/logout";
    pub const REFRESH_TOKEN: &str = "/api/auth/refresh";
    pub const PROFILE: &str = "/api/auth/profile";
}

pub mod baskets {
    pub const LIST: &str = "/baskets";

    /// Detail as served to the dashboard (singular path).
    pub fn detail(id: &str) -> String {
        format!("/basket/{}", id)
    }

    pub fn get(id: &str) -> String {
        format!("/baskets/{}", id)
    }

    pub fn invest(id: &str) -> String {
        format!("/baskets/{}/invest", id)
    }

    pub fn chart(id: &str, period: &str) -> String {
        format!("/api/baskets/{}/chart/{}", id, period)
    }
}

pub mod investments {
    pub const LIST: &str = "/investments";

    pub fn subscribe(basket_id: &str) -> String {
        format!("/investments/{}/subscribe", basket_id)
    }
}

pub mod subscription {
    pub const SUBSCRIBE: &str = "/api/subscription/subscribe";
}

pub mod mandate {
    pub const LIST: &str = "/api/mandates";

    pub fn item(id: &str) -> String {
        format!("/api/mandates/{}", id)
    }
}
