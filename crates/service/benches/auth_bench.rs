use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::service::{AuthService, AuthConfig};
use service::auth::repository::{AuthRepository, mock::MockAuthRepository};
use service::auth::domain::{RegisterInput, LoginInput};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo.clone(), AuthConfig::new("secret", jsonwebtoken::Algorithm::HS256, 60)).unwrap();

    // pre-create an active user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let user = rt
        .block_on(svc.register(RegisterInput { email: "bench@example.com".into(), first_name: "Bench".into(), last_name: "Mark".into(), password: "Benchmark1".into() }))
        .unwrap();
    rt.block_on(repo.set_active(user.id, true)).unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() })).unwrap();
        });
    });
}

fn bench_token(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo, AuthConfig::new("secret", jsonwebtoken::Algorithm::HS256, 60)).unwrap();
    let token = svc.create_token(42).unwrap().token;
    c.bench_function("auth_token_decode", |b| {
        b.iter(|| svc.decode_token(&token).unwrap());
    });
}

criterion_group!(benches, bench_login, bench_token);
criterion_main!(benches);
