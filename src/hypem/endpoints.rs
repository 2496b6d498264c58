//! Declarative endpoint definitions.
//!
//! Each [`EndpointDef`] names one remote operation: its verb, its path
//! template with `{placeholder}` identifiers, and the parameters it accepts
//! in the order they are serialized. The client executes every definition
//! through the same routine, so adding an endpoint is a table edit.

use std::collections::HashMap;

use crate::{
    hypem::params::TOKEN_PARAM,
    types::{EndpointDef, HttpVerb, ParamDef},
    utils,
};

/// Legacy names kept working across API revisions.
pub const ALIASES: &[(&str, &str)] = &[
    ("get_site_info", "get_blog"),
    ("get_site_tracks", "get_blog_tracks"),
    ("get_track_info", "get_track"),
    ("get_track_users", "get_track_favorites"),
    ("get_artist", "get_artist_info"),
    ("get_tag", "get_tag_info"),
    ("get_user_info", "get_user"),
    ("get_my_favorites", "favorites_me"),
    ("get_user_playlists", "get_user_playlist"),
    ("get_my_playlists", "get_my_playlist"),
];

const PLAYLISTS: &[&str] = &["0", "1", "2"];

impl EndpointDef {
    /// An endpoint needs a session token when its `hm_token` is required.
    pub fn requires_token(&self) -> bool {
        self.param(TOKEN_PARAM).is_some_and(|p| p.required)
    }

    pub fn param(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameters embedded in the path rather than the query or body.
    pub fn path_params(&self) -> Vec<String> {
        utils::path_params(&self.path)
    }
}

#[derive(Debug, Clone)]
pub struct EndpointTable {
    endpoints: Vec<EndpointDef>,
    aliases: HashMap<String, String>,
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EndpointTable {
    /// Builds a table from `endpoints` with the standard [`ALIASES`].
    pub fn new(endpoints: Vec<EndpointDef>) -> Self {
        let aliases = ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();
        Self { endpoints, aliases }
    }

    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases
            .insert(alias.to_string(), canonical.to_string());
    }

    /// Maps an alias to its canonical operation name. Unknown names are
    /// returned unchanged.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Looks up a definition by canonical name or alias.
    pub fn resolve(&self, name: &str) -> Option<&EndpointDef> {
        let canonical = self.canonical_name(name);
        self.endpoints.iter().find(|e| e.name == canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDef> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The endpoints of the v2 API as documented by the service.
    pub fn builtin() -> Self {
        use HttpVerb::{Delete, Get, Post};

        let endpoints = vec![
            // blogs
            ep(Get, "get_blogs", "/blogs", "List all blogs currently tracked", [
                opt("hydrate"), opt("page"), opt("count"), token(),
            ]),
            ep(Get, "get_blogs_count", "/blogs/count", "Total count of blogs in directory", [token()]),
            ep(Get, "get_blog", "/blogs/{siteid}", "Blog metadata", [req("siteid"), token()]),
            ep(Get, "get_blog_tracks", "/blogs/{siteid}/tracks", "Tracks covered by a blog", [
                req("siteid"), opt("page"), opt("count"), token(),
            ]),
            // tracks
            ep(Get, "get_tracks", "/tracks", "Latest tracks, optionally searched and sorted", [
                opt("q"), choice("sort", &["latest", "loved", "posted"]), opt("page"), opt("count"), token(),
            ]),
            ep(Get, "get_track", "/tracks/{itemid}", "Metadata of a single track", [req("itemid"), token()]),
            ep(Get, "get_track_blogs", "/tracks/{itemid}/blogs", "Blogs that posted a track", [
                req("itemid"), token(),
            ]),
            ep(Get, "get_track_favorites", "/tracks/{itemid}/users", "Users that favorited a track", [
                req("itemid"), opt("page"), opt("count"), token(),
            ]),
            ep(Get, "get_popular", "/popular", "Popular charts", [
                choice("mode", &["now", "lastweek", "noremix", "remix"]), opt("page"), opt("count"), token(),
            ]),
            // set
            ep(Get, "get_set_tracks", "/set/{setname}/tracks", "Tracks in a predefined set", [
                req("setname"), token(),
            ]),
            // artists
            ep(Get, "get_artists", "/artists", "Popular artists chart", [
                choice("sort", &["popular"]).with_default("popular"), opt("page"), opt("count"), token(),
            ]),
            ep(Get, "get_artist_info", "/artists/{artist}", "Artist metadata", [req("artist"), token()]),
            ep(Get, "get_artist_tracks", "/artists/{artist}/tracks", "Tracks by an artist", [
                req("artist"), opt("page"), opt("count"), token(),
            ]),
            // featured
            ep(Get, "get_featured", "/featured", "Featured posts and premieres", [
                choice("type", &["all", "premiere"]), opt("page"), opt("count"), token(),
            ]),
            // tags
            ep(Get, "get_tags", "/tags", "List all tags", [token()]),
            ep(Get, "get_tag_info", "/tags/{tag}", "Tag metadata", [req("tag"), token()]),
            ep(Get, "get_tag_tracks", "/tags/{tag}/tracks", "Latest tracks for a tag", [
                req("tag"), opt("fav_from"), opt("fav_to"), opt("page"), opt("count"), token(),
            ]),
            // users
            ep(Get, "search_users", "/users", "Search users by username or name", [req("q"), token()]),
            ep(Get, "get_user", "/users/{username}", "User metadata", [req("username"), token()]),
            ep(Get, "get_user_favorites", "/users/{username}/favorites", "A user's favorites", [
                req("username"), opt("page"), opt("count"), token(),
            ]),
            ep(Get, "get_user_playlist", "/users/{username}/playlists/{playlist_id}", "Items in a user's playlist", [
                req("username"), choice("playlist_id", PLAYLISTS).required(), opt("page"), opt("count"),
            ]),
            ep(Get, "get_user_friends", "/users/{username}/friends", "A user's friends", [
                req("username"), opt("page"), opt("count"), token(),
            ]),
            // me
            ep(Get, "favorites_me", "/me/favorites", "My favorites", [opt("page"), opt("count"), auth()]),
            ep(Get, "get_my_playlist", "/me/playlists/{playlist_id}", "Items in my playlist", [
                choice("playlist_id", PLAYLISTS).required(), opt("page"), opt("count"), auth(),
            ]),
            ep(Get, "get_my_history", "/me/history", "My listening history", [
                choice("sort", &["latest", "obsessed"]), opt("page"), opt("count"), auth(),
            ]),
            ep(Get, "get_my_friends", "/me/friends", "My friends", [opt("page"), opt("count"), auth()]),
            ep(Get, "get_my_feed", "/me/feed", "My subscriptions feed", [
                choice("mode", &["all", "blogs", "artists", "friends"]), opt("page"), opt("count"), auth(),
            ]),
            ep(Get, "get_my_feed_count", "/me/feed/count", "Unread items in my feed", [auth()]),
            ep(Post, "toggle_favorite", "/me/favorites", "Toggle favorite status of a track, blog or user", [
                choice("type", &["item", "site", "user"]).required(), req("val"), auth(),
            ]),
            ep(Post, "add_playlist", "/me/playlists/{playlist_id}", "Add a track to my playlist", [
                choice("playlist_id", PLAYLISTS).required(), req("itemid"), auth(),
            ]),
            ep(Delete, "remove_playlist_item", "/me/playlists/{playlist_id}/items/{itemid}", "Remove a track from my playlist", [
                choice("playlist_id", PLAYLISTS).required(), req("itemid"), auth(),
            ]),
            // misc
            ep(Post, "get_token", "/get_token", "Obtain a session token", [
                opt("username"), opt("password"), opt("fb_oauth_token"), opt("tw_oauth_token"),
                opt("tw_oauth_token_secret"), opt("device_id"),
            ]),
            ep(Post, "signup", "/signup", "Create an account", [
                req("username"), req("email"), req("password"), opt("newsletter"), req("device_id"),
                opt("fb_uid"), opt("fb_oauth_token"), opt("tw_oauth_token"), opt("tw_oauth_token_secret"),
            ]),
        ];

        Self::new(endpoints)
    }
}

fn ep<const N: usize>(
    verb: HttpVerb,
    name: &str,
    path: &str,
    summary: &str,
    params: [ParamDef; N],
) -> EndpointDef {
    EndpointDef {
        name: name.to_string(),
        verb,
        path: path.to_string(),
        params: params.into(),
        summary: summary.to_string(),
    }
}

impl ParamDef {
    pub fn optional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required: false,
            allowed: Vec::new(),
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_allowed(mut self, allowed: &[&str]) -> Self {
        self.allowed = allowed.iter().map(|v| v.to_string()).collect();
        self
    }
}

fn opt(name: &str) -> ParamDef {
    ParamDef::optional(name)
}

fn req(name: &str) -> ParamDef {
    ParamDef::optional(name).required()
}

fn choice(name: &str, allowed: &[&str]) -> ParamDef {
    ParamDef::optional(name).with_allowed(allowed)
}

fn token() -> ParamDef {
    opt(TOKEN_PARAM)
}

fn auth() -> ParamDef {
    req(TOKEN_PARAM)
}
