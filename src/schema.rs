diesel::table! {
    category (id) {
        id -> Int4,
        title -> Varchar,
        description -> Text,
        slug -> Varchar,
        is_published -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    comment (id) {
        id -> Int4,
        content -> Text,
        post_id -> Int4,
        author_id -> Int4,
        created_at -> Timestamp,
    }
}

diesel::table! {
    location (id) {
        id -> Int4,
        name -> Varchar,
        is_published -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    post (id) {
        id -> Int4,
        title -> Varchar,
        body -> Text,
        author_id -> Int4,
        category_id -> Nullable<Int4>,
        location_id -> Nullable<Int4>,
        image_url -> Nullable<Text>,
        is_published -> Bool,
        pub_date -> Timestamp,
        created_at -> Timestamp,
    }
}

diesel::table! {
    user_ (id) {
        id -> Int4,
        name -> Varchar,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        email -> Nullable<Text>,
        password_encrypted -> Text,
        published -> Timestamp,
    }
}

diesel::joinable!(comment -> post (post_id));
diesel::joinable!(comment -> user_ (author_id));
diesel::joinable!(post -> category (category_id));
diesel::joinable!(post -> location (location_id));
diesel::joinable!(post -> user_ (author_id));

diesel::allow_tables_to_appear_in_same_query!(category, comment, location, post, user_,);
