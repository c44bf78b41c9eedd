/*
 * Responsibility
 * - development 用の固定サンプル post
 */
use crate::repos::NewPost;

const SEED_POSTS: [(&str, &str); 3] = [
    (
        "Getting Started with My Portfolio",
        "Welcome! This is a demo post seeded into the database.",
    ),
    (
        "What I Learned Building a MERN App",
        "Full-stack development with MongoDB, Express, React, and Node.js.",
    ),
    (
        "Why I Love TypeScript",
        "Type safety, editor support, and predictable code make TypeScript great.",
    ),
];

pub fn seed_posts() -> Vec<NewPost> {
    SEED_POSTS
        .iter()
        .map(|(title, content)| NewPost {
            title: title.to_string(),
            content: content.to_string(),
        })
        .collect()
}
