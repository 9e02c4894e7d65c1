use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use crate::{entities::token::Claims, errors::AuthError};

/// Claims decoded by `AuthMiddleware` from a bearer token the site's auth
/// issuer signed with the shared `jwt_secret`. Rejects with 401 when the
/// request carried no such token.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthClaims(claims.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

/// Issuer claims with `admin` set. A visitor token gets 403, no token 401.
/// Taken as `Option<AdminClaims>` on public reads that reveal drafts to the
/// site owner.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) if claims.admin => {
                ready(Ok(AdminClaims(claims.clone())))
            }
            Some(_) => {
                ready(Err(AuthError::Forbidden("Admin access required".into()).into()))
            }
            None => {
                ready(Err(AuthError::MissingCredentials.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest};

    fn claims(admin: bool) -> Claims {
        Claims {
            sub: "user-1".into(),
            email: "owner@example.com".into(),
            name: None,
            admin,
            exp: 4_000_000_000,
            iat: 0,
        }
    }

    fn status_of(err: actix_web::Error) -> StatusCode {
        err.as_response_error().status_code()
    }

    #[actix_rt::test]
    async fn admin_claims_reject_visitor_tokens() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(false));

        let err = AdminClaims::extract(&req).await.unwrap_err();
        assert_eq!(status_of(err), StatusCode::FORBIDDEN);
        assert!(AuthClaims::extract(&req).await.is_ok());
    }

    #[actix_rt::test]
    async fn missing_claims_are_unauthorized() {
        let req = TestRequest::default().to_http_request();

        let err = AdminClaims::extract(&req).await.unwrap_err();
        assert_eq!(status_of(err), StatusCode::UNAUTHORIZED);
        let err = AuthClaims::extract(&req).await.unwrap_err();
        assert_eq!(status_of(err), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn admin_claims_accept_owner_tokens() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(true));

        let AdminClaims(found) = AdminClaims::extract(&req).await.unwrap();
        assert_eq!(found.sub, "user-1");
    }
}
