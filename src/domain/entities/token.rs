use serde::{Serialize, Deserialize};

/// Claims carried by bearer tokens issued by the site's auth provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub admin: bool,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub admin: bool,
    pub expires_at: usize,
}

impl From<&Claims> for ProfileResponse {
    fn from(claims: &Claims) -> Self {
        ProfileResponse {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            admin: claims.admin,
            expires_at: claims.exp,
        }
    }
}
