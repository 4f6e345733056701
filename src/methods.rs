//! The table of VK API remote procedures.
//!
//! Every binding is plain data: a [`Method`] naming its namespace, its name
//! and the remote procedure string sent on the wire. Calls go through
//! [`Client::invoke`](crate::Client::invoke) with a constant from one of the
//! namespace modules, or through [`Client::call`](crate::Client::call) with
//! any remote string.
//!
//! ```
//! use vkapi::methods;
//!
//! assert_eq!(methods::users::GET.remote(), "users.get");
//! assert_eq!(methods::photos::GET_ALBUMS.name(), "getAlbums");
//! assert_eq!(methods::find("wall.post"), Some(methods::wall::POST));
//! ```

use std::fmt;

/// A remote procedure of the VK API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Method {
    namespace: &'static str,
    name: &'static str,
    remote: &'static str,
}

impl Method {
    pub const fn new(namespace: &'static str, name: &'static str, remote: &'static str) -> Self {
        Self {
            namespace,
            name,
            remote,
        }
    }

    /// The namespace, e.g. `users`. Empty for top-level procedures.
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// The name within the namespace, e.g. `get`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The string sent on the wire, e.g. `users.get`.
    pub fn remote(&self) -> &'static str {
        self.remote
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.remote)
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.remote
    }
}

/// Runs a batch of API calls written in VKScript on the server side.
pub const EXECUTE: Method = Method::new("", "execute", "execute");

/// Looks a method up by its remote string.
pub fn find(remote: &str) -> Option<Method> {
    ALL.iter().copied().find(|m| m.remote == remote)
}

/// Returns every method of a namespace, in declaration order.
pub fn namespace(namespace: &str) -> impl Iterator<Item = Method> + '_ {
    ALL.iter().copied().filter(move |m| m.namespace == namespace)
}

macro_rules! api_methods {
    ($( $ns:ident { $( $konst:ident => $name:literal ),* $(,)? } )*) => {
        $(
            #[doc = concat!("Methods of the `", stringify!($ns), "` namespace.")]
            pub mod $ns {
                use super::Method;

                $(
                    #[doc = concat!("`", stringify!($ns), ".", $name, "`")]
                    pub const $konst: Method =
                        Method::new(stringify!($ns), $name, concat!(stringify!($ns), ".", $name));
                )*
            }
        )*

        /// Every known method, namespaced ones first in declaration order.
        pub static ALL: &[Method] = &[
            $( $( $ns::$konst, )* )*
            EXECUTE,
        ];
    };
}

api_methods! {
    users {
        GET => "get",
        SEARCH => "search",
        IS_APP_USER => "isAppUser",
        GET_SUBSCRIPTIONS => "getSubscriptions",
        GET_FOLLOWERS => "getFollowers",
        REPORT => "report",
        GET_NEARBY => "getNearby",
    }
    auth {
        CHECK_PHONE => "checkPhone",
        SIGNUP => "signup",
        CONFIRM => "confirm",
        RESTORE => "restore",
    }
    wall {
        GET => "get",
        SEARCH => "search",
        GET_BY_ID => "getById",
        POST => "post",
        REPOST => "repost",
        GET_REPOSTS => "getReposts",
        EDIT => "edit",
        DEL => "del",
        RESTORE => "restore",
        PIN => "pin",
        UNPIN => "unpin",
        GET_COMMENTS => "getComments",
        ADD_COMMENT => "addComment",
        EDIT_COMMENT => "editComment",
        DEL_COMMENT => "delComment",
        RESTORE_COMMENT => "restoreComment",
        REPORT_POST => "reportPost",
        REPORT_COMMENT => "reportComment",
    }
    photos {
        CREATE_ALBUM => "createAlbum",
        EDIT_ALBUM => "editAlbum",
        GET_ALBUMS => "getAlbums",
        GET => "get",
        GET_ALBUMS_COUNT => "getAlbumsCount",
        GET_BY_ID => "getById",
        GET_UPLOAD_SERVER => "getUploadServer",
        GET_OWNER_PHOTO_UPLOAD_SERVER => "getOwnerPhotoUploadServer",
        GET_CHAT_UPLOAD_SERVER => "getChatUploadServer",
        GET_MARKET_UPLOAD_SERVER => "getMarketUploadServer",
        GET_MARKET_ALBUM_UPLOAD_SERVER => "getMarketAlbumUploadServer",
        SAVE_MARKET_PHOTO => "saveMarketPhoto",
        SAVE_MARKET_ALBUM_PHOTO => "saveMarketAlbumPhoto",
        SAVE_OWNER_PHOTO => "saveOwnerPhoto",
        SAVE_WALL_PHOTO => "saveWallPhoto",
        GET_WALL_UPLOAD_SERVER => "getWallUploadServer",
        GET_MESSAGES_UPLOAD_SERVER => "getMessagesUploadServer",
        SAVE_MESSAGES_PHOTO => "saveMessagesPhoto",
        REPORT => "report",
        REPORT_COMMENT => "reportComment",
        SEARCH => "search",
        SAVE => "save",
        COPY => "copy",
        EDIT => "edit",
        MOVE => "move",
        MAKE_COVER => "makeCover",
        REORDER_ALBUMS => "reorderAlbums",
        REORDER_PHOTOS => "reorderPhotos",
        GET_ALL => "getAll",
        GET_USER_PHOTOS => "getUserPhotos",
        DEL_ALBUM => "delAlbum",
        DEL => "del",
        RESTORE => "restore",
        CONFIRM_TAG => "confirmTag",
        GET_COMMENTS => "getComments",
        GET_ALL_COMMENTS => "getAllComments",
        CREATE_COMMENT => "createComment",
        DEL_COMMENT => "delComment",
        RESTORE_COMMENT => "restoreComment",
        EDIT_COMMENT => "editComment",
        GET_TAGS => "getTags",
        PUT_TAG => "putTag",
        REMOVE_TAG => "removeTag",
        GET_NEW_TAGS => "getNewTags",
    }
    friends {
        GET => "get",
        GET_ONLINE => "getOnline",
        GET_MUTUAL => "getMutual",
        GET_RECENT => "getRecent",
        GET_REQUESTS => "getRequests",
        ADD => "add",
        EDIT => "edit",
        DEL => "del",
        GET_LISTS => "getLists",
        ADD_LIST => "addList",
        EDIT_LIST => "editList",
        DEL_LIST => "delList",
        GET_APP_USERS => "getAppUsers",
        GET_BY_PHONES => "getByPhones",
        DEL_ALL_REQUESTS => "delAllRequests",
        GET_SUGGESTIONS => "getSuggestions",
        ARE_FRIENDS => "areFriends",
        GET_AVAILABLE_FOR_CALL => "getAvailableForCall",
        SEARCH => "search",
    }
    widgets {
        GET_COMMENTS => "getComments",
        GET_PAGES => "getPages",
    }
    storage {
        GET => "get",
        SET => "set",
        GET_KEYS => "getKeys",
    }
    status {
        GET => "get",
        SET => "set",
    }
    audio {
        GET => "get",
        GET_BY_ID => "getById",
        GET_LYRICS => "getLyrics",
        SEARCH => "search",
        GET_UPLOAD_SERVER => "getUploadServer",
        SAVE => "save",
        ADD => "add",
        DEL => "del",
        EDIT => "edit",
        REORDER => "reorder",
        RESTORE => "restore",
        GET_ALBUMS => "getAlbums",
        ADD_ALBUM => "addAlbum",
        EDIT_ALBUM => "editAlbum",
        DEL_ALBUM => "delAlbum",
        MOVE_TO_ALBUM => "moveToAlbum",
        SET_BROADCAST => "setBroadcast",
        GET_BROADCAST_LIST => "getBroadcastList",
        GET_RECOMMENDATIONS => "getRecommendations",
        GET_POPULAR => "getPopular",
        GET_COUNT => "getCount",
    }
    pages {
        GET => "get",
        SAVE => "save",
        SAVE_ACCESS => "saveAccess",
        GET_HISTORY => "getHistory",
        GET_TITLES => "getTitles",
        GET_VERSION => "getVersion",
        PARSE_WIKI => "parseWiki",
        CLEAR_CACHE => "clearCache",
    }
    groups {
        IS_MEMBER => "isMember",
        GET_BY_ID => "getById",
        GET => "get",
        GET_MEMBERS => "getMembers",
        JOIN => "join",
        LEAVE => "leave",
        SEARCH => "search",
        GET_CATALOG => "getCatalog",
        GET_CATALOG_INFO => "getCatalogInfo",
        GET_INVITES => "getInvites",
        GET_INVITED_USERS => "getInvitedUsers",
        BAN_USER => "banUser",
        UNBAN_USER => "unbanUser",
        GET_BANNED => "getBanned",
        CREATE => "create",
        EDIT => "edit",
        EDIT_PLACE => "editPlace",
        GET_SETTINGS => "getSettings",
        GET_REQUESTS => "getRequests",
        EDIT_MANAGER => "editManager",
        INVITE => "invite",
        ADD_LINK => "addLink",
        DEL_LINK => "delLink",
        EDIT_LINK => "editLink",
        REORDER_LINK => "reorderLink",
        REMOVE_USER => "removeUser",
        APPROVE_REQUEST => "approveRequest",
    }
    board {
        GET_TOPICS => "getTopics",
        GET_COMMENTS => "getComments",
        ADD_TOPIC => "addTopic",
        ADD_COMMENT => "addComment",
        DEL_TOPIC => "delTopic",
        EDIT_TOPIC => "editTopic",
        EDIT_COMMENT => "editComment",
        RESTORE_COMMENT => "restoreComment",
        DEL_COMMENT => "delComment",
        OPEN_TOPIC => "openTopic",
        CLOSE_TOPIC => "closeTopic",
        FIX_TOPIC => "fixTopic",
        UNFIX_TOPIC => "unfixTopic",
    }
    video {
        GET => "get",
        EDIT => "edit",
        ADD => "add",
        SAVE => "save",
        DEL => "del",
        RESTORE => "restore",
        SEARCH => "search",
        GET_USER_VIDEOS => "getUserVideos",
        GET_ALBUMS => "getAlbums",
        GET_ALBUM_BY_ID => "getAlbumById",
        ADD_ALBUM => "addAlbum",
        EDIT_ALBUM => "editAlbum",
        DEL_ALBUM => "delAlbum",
        REORDER_ALBUMS => "reorderAlbums",
        REORDER_VIDEOS => "reorderVideos",
        ADD_TO_ALBUM => "addToAlbum",
        REMOVE_FROM_ALBUM => "removeFromAlbum",
        GET_ALBUMS_BY_VIDEO => "getAlbumsByVideo",
        GET_COMMENTS => "getComments",
        CREATE_COMMENT => "createComment",
        DEL_COMMENT => "delComment",
        RESTORE_COMMENT => "restoreComment",
        EDIT_COMMENT => "editComment",
        GET_TAGS => "getTags",
        PUT_TAG => "putTag",
        REMOVE_TAG => "removeTag",
        GET_NEW_TAGS => "getNewTags",
        REPORT => "report",
        REPORT_COMMENT => "reportComment",
        GET_CATALOG => "getCatalog",
        GET_CATALOG_SECTION => "getCatalogSection",
        HIDE_CATALOG_SECTION => "hideCatalogSection",
    }
    notes {
        GET => "get",
        GET_BY_ID => "getById",
        ADD => "add",
        EDIT => "edit",
        DEL => "del",
        GET_COMMENTS => "getComments",
        CREATE_COMMENT => "createComment",
        EDIT_COMMENT => "editComment",
        DEL_COMMENT => "delComment",
        RESTORE_COMMENT => "restoreComment",
    }
    places {
        ADD => "add",
        GET_BY_ID => "getById",
        SEARCH => "search",
        CHECKIN => "checkin",
        GET_CHECKINS => "getCheckins",
        GET_TYPES => "getTypes",
    }
    account {
        GET_COUNTERS => "getCounters",
        SET_NAME_IN_MENU => "setNameInMenu",
        SET_ONLINE => "setOnline",
        SET_OFFLINE => "setOffline",
        LOOKUP_CONTACTS => "lookupContacts",
        REGISTER_DEVICE => "registerDevice",
        UNREGISTER_DEVICE => "unregisterDevice",
        SET_SILENCE_MODE => "setSilenceMode",
        GET_PUSH_SETTINGS => "getPushSettings",
        SET_PUSH_SETTINGS => "setPushSettings",
        GET_APP_PERMISSIONS => "getAppPermissions",
        GET_ACTIVE_OFFERS => "getActiveOffers",
        BAN_USER => "banUser",
        UNBAN_USER => "unbanUser",
        GET_BANNED => "getBanned",
        GET_INFO => "getInfo",
        SET_INFO => "setInfo",
        CHANGE_PASSWORD => "changePassword",
        GET_PROFILE_INFO => "getProfileInfo",
        SAVE_PROFILE_INFO => "saveProfileInfo",
    }
    messages {
        GET => "get",
        GET_DIALOGS => "getDialogs",
        GET_BY_ID => "getById",
        SEARCH => "search",
        GET_HISTORY => "getHistory",
        GET_HISTORY_ATTACHMENTS => "getHistoryAttachments",
        SEND => "send",
        DEL => "del",
        DEL_DIALOG => "delDialog",
        RESTORE => "restore",
        MARK_AS_READ => "markAsRead",
        MARK_AS_IMPORTANT => "markAsImportant",
        GET_LONG_POLL_SERVER => "getLongPollServer",
        GET_LONG_POLL_HISTORY => "getLongPollHistory",
        GET_CHAT => "getChat",
        CREATE_CHAT => "createChat",
        EDIT_CHAT => "editChat",
        GET_CHAT_USERS => "getChatUsers",
        SET_ACTIVITY => "setActivity",
        SEARCH_DIALOGS => "searchDialogs",
        ADD_CHAT_USER => "addChatUser",
        REMOVE_CHAT_USER => "removeChatUser",
        GET_LAST_ACTIVITY => "getLastActivity",
        SET_CHAT_PHOTO => "setChatPhoto",
        DEL_CHAT_PHOTO => "delChatPhoto",
    }
    newsfeed {
        GET => "get",
        GET_RECOMMENDED => "getRecommended",
        GET_COMMENTS => "getComments",
        GET_MENTIONS => "getMentions",
        GET_BANNED => "getBanned",
        ADD_BAN => "addBan",
        DEL_BAN => "delBan",
        IGNORE_ITEM => "ignoreItem",
        UNIGNORE_ITEM => "unignoreItem",
        SEARCH => "search",
        GET_LISTS => "getLists",
        SAVE_LIST => "saveList",
        DEL_LIST => "delList",
        UNSUBSCRIBE => "unsubscribe",
        GET_SUGGESTED_SOURCES => "getSuggestedSources",
    }
    likes {
        GET_LIST => "getList",
        ADD => "add",
        DEL => "del",
        IS_LIKED => "isLiked",
    }
    polls {
        GET_BY_ID => "getById",
        ADD_VOTE => "addVote",
        DEL_VOTE => "delVote",
        GET_VOTERS => "getVoters",
        CREATE => "create",
        EDIT => "edit",
    }
    docs {
        GET => "get",
        GET_BY_ID => "getById",
        GET_UPLOAD_SERVER => "getUploadServer",
        GET_WALL_UPLOAD_SERVER => "getWallUploadServer",
        SAVE => "save",
        DEL => "del",
        ADD => "add",
        GET_TYPES => "getTypes",
        SEARCH => "search",
        EDIT => "edit",
    }
    fave {
        GET_USERS => "getUsers",
        GET_PHOTOS => "getPhotos",
        GET_POSTS => "getPosts",
        GET_VIDEOS => "getVideos",
        GET_LINKS => "getLinks",
        GET_MARKET_ITEMS => "getMarketItems",
        ADD_USER => "addUser",
        REMOVE_USER => "removeUser",
        ADD_GROUP => "addGroup",
        REMOVE_GROUP => "removeGroup",
        ADD_LINK => "addLink",
        REMOVE_LINK => "removeLink",
    }
    notifications {
        GET => "get",
        MARK_AS_VIEWED => "markAsViewed",
    }
    stats {
        GET => "get",
        TRACK_VISITOR => "trackVisitor",
        GET_POST_REACH => "getPostReach",
    }
    search {
        GET_HINTS => "getHints",
    }
    apps {
        GET_CATALOG => "getCatalog",
        GET => "get",
        SEND_REQUEST => "sendRequest",
        DEL_APP_REQUESTS => "delAppRequests",
        GET_FRIENDS_LIST => "getFriendsList",
        GET_LEADERBOARD => "getLeaderboard",
        GET_SCORE => "getScore",
    }
    utils {
        CHECK_LINK => "checkLink",
        RESOLVE_SCREEN_NAME => "resolveScreenName",
        GET_SERVER_TIME => "getServerTime",
    }
    database {
        GET_COUNTRIES => "getCountries",
        GET_REGIONS => "getRegions",
        GET_STREETS_BY_ID => "getStreetsById",
        GET_COUNTRIES_BY_ID => "getCountriesById",
        GET_CITIES => "getCities",
        GET_CITIES_BY_ID => "getCitiesById",
        GET_UNIVERSITIES => "getUniversities",
        GET_SCHOOLS => "getSchools",
        GET_SCHOOL_CLASSES => "getSchoolClasses",
        GET_FACULTIES => "getFaculties",
        GET_CHAIRS => "getChairs",
    }
    gifts {
        GET => "get",
    }
    market {
        GET => "get",
        GET_BY_ID => "getById",
        SEARCH => "search",
        GET_ALBUMS => "getAlbums",
        GET_ALBUM_BY_ID => "getAlbumById",
        CREATE_COMMENT => "createComment",
        GET_COMMENTS => "getComments",
        DEL_COMMENT => "delComment",
        RESTORE_COMMENT => "restoreComment",
        EDIT_COMMENT => "editComment",
        REPORT_COMMENT => "reportComment",
        GET_CATEGORIES => "getCategories",
        REPORT => "report",
        ADD => "add",
        EDIT => "edit",
        DEL => "del",
        RESTORE => "restore",
        REORDER_ITEMS => "reorderItems",
        REORDER_ALBUMS => "reorderAlbums",
        ADD_ALBUM => "addAlbum",
        EDIT_ALBUM => "editAlbum",
        DEL_ALBUM => "delAlbum",
        REMOVE_FROM_ALBUM => "removeFromAlbum",
        ADD_TO_ALBUM => "addToAlbum",
    }
}
