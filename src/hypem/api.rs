//! Typed wrappers over [`HypemClient::call`], one per endpoint.
//!
//! Enumerated parameters stay plain strings and are checked against the
//! endpoint table, so an invalid choice fails the same way whether it comes
//! from here or from a generic `call`.
//!
//! # Common arguments
//!
//! * `page` - 1-based page number; `None` lets the service pick the first page
//! * `count` - Items per page; `None` uses the service default (20)
//! * `hm_token` on public reads ([`TokenArg`]) - `TokenArg::None` sends no
//!   token, `TokenArg::Stored` sends the client's token if it has one,
//!   `TokenArg::Explicit` sends the given token. With a token the service adds
//!   per-user fields such as `ts_loved_me`.
//! * `hm_token` on `/me` operations (`Option<&str>`) - the given token, or the
//!   client's stored token when `None`
//!
//! # Common errors
//!
//! Every method returns `Result<serde_json::Value>`. Besides the errors listed
//! on each method, all of them can fail with:
//!
//! - `HypemError::RateLimit` - the service answered 403
//! - `HypemError::Api` - the service answered 401 (typically a bad token)
//! - `HypemError::UnhandledStatus` - any other non-2xx status
//! - `HypemError::Protocol` - a 2xx response with an empty or non-JSON body
//! - `HypemError::Http` - transport failure
//!
//! Validation errors (`HypemError::Validation`) are raised before anything is
//! sent. Read methods are memoized for the client's cache TTL; write methods
//! (`toggle_favorite`, `add_playlist`, `remove_playlist_item`) never are.

use serde_json::Value;

use crate::{
    error::Result,
    hypem::{client::HypemClient, params::TOKEN_PARAM},
    types::{Params, TokenArg},
};

fn paged(page: Option<u32>, count: Option<u32>) -> Params {
    Params::new().with("page", page).with("count", count)
}

impl HypemClient {
    // blogs

    /// Lists every blog currently tracked by the service.
    ///
    /// # Arguments
    ///
    /// * `hydrate` - Include a short list of recently posted tracks per blog
    ///   (sent as `hydrate=1`; recommended only with a small `count`)
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token, see the module docs
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - JSON array of blog objects (`siteid`, `sitename`,
    ///   `siteurl`, ...)
    /// - `Err(HypemError)` - See the module docs
    ///
    /// # Example
    ///
    /// ```
    /// let blogs = client.get_blogs(true, Some(1), Some(5), TokenArg::None).await?;
    /// for blog in blogs.as_array().into_iter().flatten() {
    ///     println!("{}", blog["sitename"]);
    /// }
    /// ```
    pub async fn get_blogs(
        &self,
        hydrate: bool,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("hydrate", hydrate)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_blogs", params).await
    }

    /// Total number of blogs in the directory.
    pub async fn get_blogs_count(&self, hm_token: TokenArg) -> Result<Value> {
        self.call("get_blogs_count", Params::new().with(TOKEN_PARAM, hm_token))
            .await
    }

    /// Metadata of a single blog. Legacy name: `get_site_info`.
    ///
    /// # Arguments
    ///
    /// * `siteid` - Required numeric blog id, embedded in the path
    /// * `hm_token` - Optional session token
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingParameter` if `siteid` is empty
    pub async fn get_blog(&self, siteid: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("siteid", siteid)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_blog", params).await
    }

    /// Tracks posted by a blog, newest first. Legacy name: `get_site_tracks`.
    ///
    /// # Arguments
    ///
    /// * `siteid` - Required numeric blog id
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingParameter` if `siteid` is empty
    pub async fn get_blog_tracks(
        &self,
        siteid: &str,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("siteid", siteid)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_blog_tracks", params).await
    }

    // tracks

    /// Latest tracks, optionally filtered by a search query and sorted.
    ///
    /// # Arguments
    ///
    /// * `q` - Optional search query matched against artist and title
    /// * `sort` - Optional order: `latest`, `loved` or `posted`
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - JSON array of track objects (`itemid`, `artist`,
    ///   `title`, `loved_count`, ...)
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidChoice` if `sort` is not one of the values
    ///   above; nothing is sent in that case
    ///
    /// # Example
    ///
    /// ```
    /// let tracks = client
    ///     .get_tracks(Some("bonobo"), Some("loved"), None, Some(10), TokenArg::None)
    ///     .await?;
    /// println!("{}", tracks[0]["title"]);
    /// ```
    pub async fn get_tracks(
        &self,
        q: Option<&str>,
        sort: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("q", q)
            .with("sort", sort)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_tracks", params).await
    }

    /// Metadata of a single track. Legacy name: `get_track_info`.
    ///
    /// # Arguments
    ///
    /// * `itemid` - Required track id, e.g. `2fv7a`
    /// * `hm_token` - Optional session token; with one, the response tells
    ///   whether the user loved the track
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingParameter` if `itemid` is empty
    pub async fn get_track(&self, itemid: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("itemid", itemid)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_track", params).await
    }

    /// Blogs that posted a track. Not paginated.
    ///
    /// # Arguments
    ///
    /// * `itemid` - Required track id
    /// * `hm_token` - Optional session token
    pub async fn get_track_blogs(&self, itemid: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("itemid", itemid)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_track_blogs", params).await
    }

    /// Users who favorited a track. Legacy name: `get_track_users`.
    ///
    /// # Arguments
    ///
    /// * `itemid` - Required track id
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    pub async fn get_track_favorites(
        &self,
        itemid: &str,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("itemid", itemid)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_track_favorites", params).await
    }

    /// The popular charts.
    ///
    /// # Arguments
    ///
    /// * `mode` - Optional chart: `now` (default on the service side),
    ///   `lastweek`, `noremix` or `remix`
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidChoice` for any other `mode`
    ///
    /// # Example
    ///
    /// ```
    /// let chart = client.get_popular(Some("lastweek"), None, Some(50), TokenArg::None).await?;
    /// ```
    pub async fn get_popular(
        &self,
        mode: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("mode", mode)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_popular", params).await
    }

    /// Tracks of a predefined set such as `fresh` or `party`.
    ///
    /// # Arguments
    ///
    /// * `setname` - Required set name
    /// * `hm_token` - Optional session token
    pub async fn get_set_tracks(&self, setname: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("setname", setname)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_set_tracks", params).await
    }

    // artists

    /// The popular artists chart.
    ///
    /// # Arguments
    ///
    /// * `sort` - Optional, must be `popular`; `popular` is sent when `None`
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidChoice` for any `sort` other than `popular`
    pub async fn get_artists(
        &self,
        sort: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("sort", sort)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_artists", params).await
    }

    /// Artist metadata. Legacy name: `get_artist`.
    ///
    /// The artist name is percent-encoded into the path, so names with
    /// spaces or `&` are fine.
    pub async fn get_artist_info(&self, artist: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("artist", artist)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_artist_info", params).await
    }

    /// Tracks by an artist.
    ///
    /// # Arguments
    ///
    /// * `artist` - Required artist name
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    pub async fn get_artist_tracks(
        &self,
        artist: &str,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("artist", artist)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_artist_tracks", params).await
    }

    /// Featured posts and premieres.
    ///
    /// # Arguments
    ///
    /// * `kind` - Optional filter sent as `type`: `all` or `premiere`
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidChoice` for any other `kind`
    pub async fn get_featured(
        &self,
        kind: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("type", kind)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_featured", params).await
    }

    // tags

    /// Every tag known to the service. Not paginated.
    pub async fn get_tags(&self, hm_token: TokenArg) -> Result<Value> {
        self.call("get_tags", Params::new().with(TOKEN_PARAM, hm_token))
            .await
    }

    /// Tag metadata. Legacy name: `get_tag`.
    pub async fn get_tag_info(&self, tag: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("tag", tag)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_tag_info", params).await
    }

    /// Latest tracks carrying a tag.
    ///
    /// # Arguments
    ///
    /// * `tag` - Required tag name, e.g. `house`
    /// * `fav_from` - Optional lower bound on the favorite count
    /// * `fav_to` - Optional upper bound on the favorite count
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    ///
    /// A bound of `Some(0)` is treated like `None` and not sent.
    pub async fn get_tag_tracks(
        &self,
        tag: &str,
        fav_from: Option<u32>,
        fav_to: Option<u32>,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("tag", tag)
            .with("fav_from", fav_from)
            .with("fav_to", fav_to)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_tag_tracks", params).await
    }

    // users

    /// Searches users by username or full name.
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingParameter` if `q` is empty
    pub async fn search_users(&self, q: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("q", q)
            .with(TOKEN_PARAM, hm_token);
        self.call("search_users", params).await
    }

    /// Public profile of a user. Legacy name: `get_user_info`.
    pub async fn get_user(&self, username: &str, hm_token: TokenArg) -> Result<Value> {
        let params = Params::new()
            .with("username", username)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_user", params).await
    }

    /// Tracks a user has favorited.
    ///
    /// # Arguments
    ///
    /// * `username` - Required username
    /// * `page`, `count` - Pagination, both optional
    /// * `hm_token` - Optional session token
    pub async fn get_user_favorites(
        &self,
        username: &str,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("username", username)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_user_favorites", params).await
    }

    /// Items in one of a user's three playlists. Legacy name:
    /// `get_user_playlists`.
    ///
    /// This endpoint takes no session token.
    ///
    /// # Arguments
    ///
    /// * `username` - Required username
    /// * `playlist_id` - Required, `0`, `1` or `2`; `0` is a valid id and is
    ///   rendered into the path
    /// * `page`, `count` - Pagination, both optional
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidChoice` for any other `playlist_id`
    /// - `ValidationError::MissingParameter` if `username` is empty
    ///
    /// # Example
    ///
    /// ```
    /// let first = client.get_user_playlist("someone", 0, None, None).await?;
    /// ```
    pub async fn get_user_playlist(
        &self,
        username: &str,
        playlist_id: u8,
        page: Option<u32>,
        count: Option<u32>,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("username", username)
            .with("playlist_id", playlist_id);
        self.call("get_user_playlist", params).await
    }

    /// A user's friends.
    pub async fn get_user_friends(
        &self,
        username: &str,
        page: Option<u32>,
        count: Option<u32>,
        hm_token: TokenArg,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("username", username)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_user_friends", params).await
    }

    // me: these fall back to the stored session token

    /// Tracks the authenticated user has favorited. Legacy name:
    /// `get_my_favorites`.
    ///
    /// # Arguments
    ///
    /// * `hm_token` - Session token; `None` uses the client's stored token
    /// * `page`, `count` - Pagination, both optional
    ///
    /// # Errors
    ///
    /// - `ValidationError::AuthenticationRequired` if no token was given and
    ///   none is stored; nothing is sent in that case
    /// - `HypemError::Api` if the service rejects the token
    ///
    /// # Example
    ///
    /// ```
    /// client.login(LoginCredentials::password("me", "secret")).await?;
    /// let mine = client.favorites_me(None, None, Some(50)).await?;
    /// ```
    pub async fn favorites_me(
        &self,
        hm_token: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
    ) -> Result<Value> {
        let params = paged(page, count).with(TOKEN_PARAM, hm_token);
        self.call("favorites_me", params).await
    }

    /// Items in one of the authenticated user's playlists. Legacy name:
    /// `get_my_playlists`.
    ///
    /// # Arguments
    ///
    /// * `hm_token` - Session token; `None` uses the stored token
    /// * `playlist_id` - Required, `0`, `1` or `2`
    /// * `page`, `count` - Pagination, both optional
    ///
    /// # Errors
    ///
    /// - `ValidationError::AuthenticationRequired` without any token
    /// - `ValidationError::InvalidChoice` for any other `playlist_id`
    pub async fn get_my_playlist(
        &self,
        hm_token: Option<&str>,
        playlist_id: u8,
        page: Option<u32>,
        count: Option<u32>,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("playlist_id", playlist_id)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_my_playlist", params).await
    }

    /// The authenticated user's listening history.
    ///
    /// # Arguments
    ///
    /// * `hm_token` - Session token; `None` uses the stored token
    /// * `sort` - Optional: `latest` or `obsessed`
    /// * `page`, `count` - Pagination, both optional
    ///
    /// # Errors
    ///
    /// - `ValidationError::AuthenticationRequired` without any token
    /// - `ValidationError::InvalidChoice` for any other `sort`
    pub async fn get_my_history(
        &self,
        hm_token: Option<&str>,
        sort: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("sort", sort)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_my_history", params).await
    }

    /// The authenticated user's friends. Requires a token, given or stored.
    pub async fn get_my_friends(
        &self,
        hm_token: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
    ) -> Result<Value> {
        let params = paged(page, count).with(TOKEN_PARAM, hm_token);
        self.call("get_my_friends", params).await
    }

    /// The authenticated user's subscription feed.
    ///
    /// # Arguments
    ///
    /// * `hm_token` - Session token; `None` uses the stored token
    /// * `mode` - Optional: `all`, `blogs`, `artists` or `friends`
    /// * `page`, `count` - Pagination, both optional
    ///
    /// # Errors
    ///
    /// - `ValidationError::AuthenticationRequired` without any token
    /// - `ValidationError::InvalidChoice` for any other `mode`
    pub async fn get_my_feed(
        &self,
        hm_token: Option<&str>,
        mode: Option<&str>,
        page: Option<u32>,
        count: Option<u32>,
    ) -> Result<Value> {
        let params = paged(page, count)
            .with("mode", mode)
            .with(TOKEN_PARAM, hm_token);
        self.call("get_my_feed", params).await
    }

    /// Number of unread items in the feed. Requires a token.
    pub async fn get_my_feed_count(&self, hm_token: Option<&str>) -> Result<Value> {
        self.call("get_my_feed_count", Params::new().with(TOKEN_PARAM, hm_token))
            .await
    }

    /// Toggles the favorite status of a track, blog or user.
    ///
    /// Sent as a form POST; the result is never cached.
    ///
    /// # Arguments
    ///
    /// * `kind` - Required, sent as `type`: `item` (track), `site` (blog) or
    ///   `user`
    /// * `val` - Required id of the track, blog or user
    /// * `hm_token` - Session token; `None` uses the stored token
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - The new state, `1` (favorite) or `0`
    ///
    /// # Errors
    ///
    /// - `ValidationError::AuthenticationRequired` without any token
    /// - `ValidationError::InvalidChoice` for any other `kind`
    /// - `ValidationError::MissingParameter` if `val` is empty
    ///
    /// # Example
    ///
    /// ```
    /// let state = client.toggle_favorite("item", "2fv7a", None).await?;
    /// assert_eq!(state, 1);
    /// ```
    pub async fn toggle_favorite(&self, kind: &str, val: &str, hm_token: Option<&str>) -> Result<Value> {
        let params = Params::new()
            .with("type", kind)
            .with("val", val)
            .with(TOKEN_PARAM, hm_token);
        self.call("toggle_favorite", params).await
    }

    /// Adds a track to one of the authenticated user's playlists.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Required, `0`, `1` or `2`
    /// * `itemid` - Required track id
    /// * `hm_token` - Session token; `None` uses the stored token
    ///
    /// # Errors
    ///
    /// - `ValidationError::AuthenticationRequired` without any token
    /// - `ValidationError::InvalidChoice` for any other `playlist_id`
    pub async fn add_playlist(&self, playlist_id: u8, itemid: &str, hm_token: Option<&str>) -> Result<Value> {
        let params = Params::new()
            .with("playlist_id", playlist_id)
            .with("itemid", itemid)
            .with(TOKEN_PARAM, hm_token);
        self.call("add_playlist", params).await
    }

    /// Removes a track from one of the authenticated user's playlists.
    ///
    /// Sent as DELETE to `/me/playlists/{playlist_id}/items/{itemid}`; both
    /// ids go into the path, the token and site key into the form body.
    ///
    /// # Errors
    ///
    /// Same as [`HypemClient::add_playlist`].
    pub async fn remove_playlist_item(
        &self,
        playlist_id: u8,
        itemid: &str,
        hm_token: Option<&str>,
    ) -> Result<Value> {
        let params = Params::new()
            .with("playlist_id", playlist_id)
            .with("itemid", itemid)
            .with(TOKEN_PARAM, hm_token);
        self.call("remove_playlist_item", params).await
    }
}
