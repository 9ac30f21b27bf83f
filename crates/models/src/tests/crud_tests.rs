use anyhow::Result;
use sea_orm::{EntityTrait, ModelTrait, TransactionTrait};
use uuid::Uuid;

use super::setup_test_db;
use crate::{guide, profession, user, user_detail};

fn unique_email() -> String {
    format!("model_{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email();
    let created = user::create(&db, &email.to_uppercase(), "$argon2id$fake", " John ", "Brown").await?;
    assert_eq!(created.email, email);
    assert_eq!(created.first_name, "John");
    assert!(!created.is_active);

    let found = user::find_by_email(&db, &email).await?.expect("user by email");
    assert_eq!(found.id, created.id);

    let activated = user::set_active(&db, created.id, true).await?;
    assert!(activated.is_active);

    let renamed = user::update_names(&db, created.id, "Jane", "Doe").await?;
    assert_eq!((renamed.first_name.as_str(), renamed.last_name.as_str()), ("Jane", "Doe"));

    user::update_password(&db, created.id, "$argon2id$other").await?;
    let reloaded = user::Entity::find_by_id(created.id).one(&db).await?.expect("reload");
    assert_eq!(reloaded.password, "$argon2id$other");

    assert!(user::delete(&db, created.id).await?);
    assert!(!user::delete(&db, created.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_missing_user_update_is_not_found() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let err = user::set_active(&db, i32::MAX, true).await.unwrap_err();
    assert!(matches!(err, crate::errors::ModelError::NotFound("user")));
    Ok(())
}

#[tokio::test]
async fn test_detail_and_profession_relations() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, &unique_email(), "$argon2id$fake", "Ann", "Lee").await?;
    assert!(user_detail::find_by_user(&db, u.id).await?.is_none());
    let detail = user_detail::get_or_create(&db, u.id).await?;
    let again = user_detail::get_or_create(&db, u.id).await?;
    assert_eq!(detail.id, again.id);

    let p = profession::create(&db, &format!("Carpenter {}", Uuid::new_v4())).await?;
    let mut am: user_detail::ActiveModel = detail.into();
    am.profession_id = sea_orm::Set(Some(p.id));
    let detail = sea_orm::ActiveModelTrait::update(am, &db).await?;

    let linked = detail.find_related(profession::Entity).one(&db).await?.expect("profession");
    assert_eq!(linked.id, p.id);
    assert!(profession::list(&db).await?.iter().any(|x| x.id == p.id));

    // cascade removes the detail row with its user
    user::delete(&db, u.id).await?;
    assert!(user_detail::find_by_user(&db, u.id).await?.is_none());
    profession::Entity::delete_by_id(p.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_guide_belongs_to_user_and_rolls_back() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let txn = db.begin().await?;
    let u = user::create(&txn, &unique_email(), "$argon2id$fake", "Tom", "Ray").await?;
    let g = guide::create(&txn, u.id, "  Knots  ", "How to tie knots", Some(" "), false).await?;
    assert_eq!(g.title, "Knots");
    assert_eq!(g.note, None);
    let author = g.find_related(user::Entity).one(&txn).await?.expect("author");
    assert_eq!(author.id, u.id);
    txn.rollback().await?;

    assert!(guide::Entity::find_by_id(g.id).one(&db).await?.is_none());
    Ok(())
}
