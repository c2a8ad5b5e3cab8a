use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, TestRequest};
use actix_web::web::Data;
use actix_web::App;
use chrono::Duration;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use minipress::claims::Claims;
use minipress::db::comment::{Comment, CommentForm};
use minipress::db::comment_view::CommentView;
use minipress::db::post::{Post, PostForm};
use minipress::db::user::{UserForm, User_};
use minipress::db::Crud;
use minipress::routes;
use minipress::routes::comments::CommentFormData;
use minipress::routes::posts::PostFormData;
use minipress::session::auth_cookie;
use minipress::settings::Settings;
use minipress::DbPool;
use pretty_assertions::assert_eq;
use serial_test::serial;

fn test_pool() -> DbPool {
  let manager = ConnectionManager::<PgConnection>::new(Settings::get().get_database_url());
  Pool::builder()
    .max_size(2)
    .build(manager)
    .expect("couldn't build test pool")
}

fn create_user(pool: &DbPool, username: &str) -> User_ {
  let mut conn = pool.get().unwrap();
  User_::create(
    &mut conn,
    &UserForm {
      name: username.into(),
      first_name: None,
      last_name: None,
      email: None,
      password_encrypted: "nope".into(),
    },
  )
  .unwrap()
}

fn create_post(pool: &DbPool, author_id: i32, title: &str) -> Post {
  let mut conn = pool.get().unwrap();
  Post::create(
    &mut conn,
    &PostForm {
      title: title.into(),
      body: "body".into(),
      author_id,
      category_id: None,
      location_id: None,
      image_url: None,
      pub_date: chrono::Utc::now().naive_utc() - Duration::days(1),
    },
  )
  .unwrap()
}

fn delete_user(pool: &DbPool, user_id: i32) {
  let mut conn = pool.get().unwrap();
  User_::delete(&mut conn, user_id).unwrap();
}

fn session_cookie(user_id: i32) -> actix_web::cookie::Cookie<'static> {
  auth_cookie(Claims::jwt(user_id, Settings::get().hostname).unwrap())
}

fn location_of(resp: &actix_web::dev::ServiceResponse) -> &str {
  resp.headers().get(LOCATION).unwrap().to_str().unwrap()
}

fn edited_form(post: &Post) -> PostFormData {
  PostFormData {
    title: format!("{} (edited)", post.title),
    body: post.body.to_owned(),
    pub_date: post.pub_date.format("%Y-%m-%dT%H:%M").to_string(),
    image_url: None,
    category_id: None,
    location_id: None,
  }
}

#[actix_web::test]
#[serial]
#[ignore = "needs a running postgres"]
async fn test_post_edit_and_delete_are_author_only() {
  let pool = test_pool();
  let author = create_user(&pool, "gate_author");
  let reader = create_user(&pool, "gate_reader");
  let post = create_post(&pool, author.id, "gated post");
  let detail = format!("/posts/{}", post.id);

  let app = init_service(
    App::new()
      .app_data(Data::new(pool.clone()))
      .configure(routes::posts::config),
  )
  .await;

  // Someone else's edit view bounces to the detail page.
  let req = TestRequest::get()
    .uri(&format!("/posts/{}/edit", post.id))
    .cookie(session_cookie(reader.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location_of(&resp), detail);

  // Submitting the edit form hits the same gate, and nothing is written.
  let req = TestRequest::post()
    .uri(&format!("/posts/{}/edit", post.id))
    .cookie(session_cookie(reader.id))
    .set_form(&edited_form(&post))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location_of(&resp), detail);
  {
    let mut conn = pool.get().unwrap();
    assert_eq!(Post::read(&mut conn, post.id).unwrap().title, "gated post");
  }

  // Delete doesn't even admit the page exists for non-authors.
  let req = TestRequest::get()
    .uri(&format!("/posts/{}/delete", post.id))
    .cookie(session_cookie(reader.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let req = TestRequest::post()
    .uri(&format!("/posts/{}/delete", post.id))
    .cookie(session_cookie(reader.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  {
    let mut conn = pool.get().unwrap();
    assert!(Post::read(&mut conn, post.id).is_ok());
  }

  // The author gets the edit form.
  let req = TestRequest::get()
    .uri(&format!("/posts/{}/edit", post.id))
    .cookie(session_cookie(author.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  delete_user(&pool, author.id);
  delete_user(&pool, reader.id);
}

#[actix_web::test]
#[serial]
#[ignore = "needs a running postgres"]
async fn test_comment_author_comes_from_the_session() {
  let pool = test_pool();
  let author = create_user(&pool, "thread_author");
  let commenter = create_user(&pool, "thread_commenter");
  let post = create_post(&pool, author.id, "commented post");

  let app = init_service(
    App::new()
      .app_data(Data::new(pool.clone()))
      .configure(routes::comments::config),
  )
  .await;

  let req = TestRequest::post()
    .uri(&format!("/posts/{}/comment", post.id))
    .cookie(session_cookie(commenter.id))
    .set_form(&CommentFormData {
      content: "hello".into(),
    })
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location_of(&resp), format!("/posts/{}", post.id));

  {
    let mut conn = pool.get().unwrap();
    let comments = CommentView::for_post(&mut conn, post.id).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_id, commenter.id);
    assert_eq!(comments[0].content, "hello");
  }

  // Anonymous requests go to the login page and write nothing.
  let req = TestRequest::post()
    .uri(&format!("/posts/{}/comment", post.id))
    .set_form(&CommentFormData {
      content: "anonymous".into(),
    })
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location_of(&resp), "/login");
  {
    let mut conn = pool.get().unwrap();
    assert_eq!(CommentView::for_post(&mut conn, post.id).unwrap().len(), 1);
  }

  delete_user(&pool, author.id);
  delete_user(&pool, commenter.id);
}

#[actix_web::test]
#[serial]
#[ignore = "needs a running postgres"]
async fn test_comment_edit_and_delete_are_author_only() {
  let pool = test_pool();
  let author = create_user(&pool, "reply_author");
  let commenter = create_user(&pool, "reply_commenter");
  let post = create_post(&pool, author.id, "replied post");
  let other_post = create_post(&pool, author.id, "another post");
  let detail = format!("/posts/{}", post.id);

  let comment = {
    let mut conn = pool.get().unwrap();
    Comment::create(
      &mut conn,
      &CommentForm {
        content: "original".into(),
        post_id: post.id,
        author_id: commenter.id,
      },
    )
    .unwrap()
  };

  let app = init_service(
    App::new()
      .app_data(Data::new(pool.clone()))
      .configure(routes::comments::config),
  )
  .await;

  // The post's author still can't touch someone else's comment.
  let req = TestRequest::get()
    .uri(&format!("/posts/{}/edit_comment/{}", post.id, comment.id))
    .cookie(session_cookie(author.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location_of(&resp), detail);

  let req = TestRequest::post()
    .uri(&format!("/posts/{}/delete_comment/{}", post.id, comment.id))
    .cookie(session_cookie(author.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location_of(&resp), detail);
  {
    let mut conn = pool.get().unwrap();
    assert_eq!(Comment::read(&mut conn, comment.id).unwrap().content, "original");
  }

  // Addressing the comment under the wrong post is a 404.
  let req = TestRequest::get()
    .uri(&format!("/posts/{}/edit_comment/{}", other_post.id, comment.id))
    .cookie(session_cookie(commenter.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  // The comment's author can delete it.
  let req = TestRequest::post()
    .uri(&format!("/posts/{}/delete_comment/{}", post.id, comment.id))
    .cookie(session_cookie(commenter.id))
    .to_request();
  let resp = call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location_of(&resp), detail);
  {
    let mut conn = pool.get().unwrap();
    assert!(Comment::read(&mut conn, comment.id).is_err());
  }

  delete_user(&pool, author.id);
  delete_user(&pool, commenter.id);
}
