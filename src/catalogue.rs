//! Descriptors for a representative slice of the remote API.
//!
//! Each entry is plain data; [`CallDescriptor::instantiate`] turns it into an [`ApiCall`]
//! ready to receive values.
//!
//! [`ApiCall`]: crate::call::ApiCall

// std
use std::{collections::HashMap, sync::LazyLock};
// self
use crate::call::{AccessRequirements, CallDescriptor, ParamSpec, ResultShape};

const IMAGE: [ParamSpec; 2] = [ParamSpec::optional("imageSize"), ParamSpec::optional("imageFormat")];

/// `characters.getCharacterLevels`: every level of one character.
pub const GET_CHARACTER_LEVELS: CallDescriptor = CallDescriptor {
	name: "characters.getCharacterLevels",
	parameters: &[
		ParamSpec::compulsory("characterID"),
		ParamSpec::optional("levelMax"),
		IMAGE[0],
		IMAGE[1],
	],
	access: AccessRequirements::PUBLIC,
	returns: ResultShape::ITEMS_AND_CONTEXT,
};
/// `characters.getCharacters`: characters filtered by id or clan.
pub const GET_CHARACTERS: CallDescriptor = CallDescriptor {
	name: "characters.getCharacters",
	parameters: &[
		ParamSpec::optional("charactersIDs"),
		ParamSpec::optional("clanID"),
		ParamSpec::optional("sortby"),
		ParamSpec::optional("orderby"),
		IMAGE[0],
		IMAGE[1],
		ParamSpec::optional("maxLevels"),
	],
	access: AccessRequirements::PUBLIC,
	returns: ResultShape::ITEMS_AND_CONTEXT,
};
/// `characters.getClans`: every clan.
pub const GET_CLANS: CallDescriptor = CallDescriptor {
	name: "characters.getClans",
	parameters: &IMAGE,
	access: AccessRequirements::PUBLIC,
	returns: ResultShape::ITEMS_AND_CONTEXT,
};
/// `collections.getCollectionPage`: one page of the player's collection.
pub const GET_COLLECTION_PAGE: CallDescriptor = CallDescriptor {
	name: "collections.getCollectionPage",
	parameters: &[
		ParamSpec::optional("deckOnly"),
		ParamSpec::optional("page"),
		ParamSpec::optional("nbPerPage"),
		ParamSpec::optional("clanID"),
		ParamSpec::optional("groupBy"),
		ParamSpec::optional("sortBy"),
		ParamSpec::optional("orderBy"),
		ParamSpec::optional("search"),
		IMAGE[0],
		IMAGE[1],
	],
	access: AccessRequirements::USER,
	returns: ResultShape::ITEMS_AND_CONTEXT,
};
/// `general.getPlayer`: the authenticated player.
pub const GET_PLAYER: CallDescriptor = CallDescriptor {
	name: "general.getPlayer",
	parameters: &IMAGE,
	access: AccessRequirements::USER,
	returns: ResultShape::CONTEXT,
};
/// `general.getTips`: gameplay tips.
pub const GET_TIPS: CallDescriptor = CallDescriptor {
	name: "general.getTips",
	parameters: &[],
	access: AccessRequirements::PUBLIC,
	returns: ResultShape::ITEMS_AND_CONTEXT,
};
/// `guilds.sendGuildMsg`: posts on the guild board.
pub const SEND_GUILD_MSG: CallDescriptor = CallDescriptor {
	name: "guilds.sendGuildMsg",
	parameters: &[ParamSpec::compulsory("msg")],
	access: AccessRequirements::ACTION,
	returns: ResultShape::CONTEXT,
};
/// `players.getFeed`: the player's news feed.
pub const GET_FEED: CallDescriptor = CallDescriptor {
	name: "players.getFeed",
	parameters: &[ParamSpec::optional("nbStoriesMax"), ParamSpec::optional("highestID")],
	access: AccessRequirements::USER,
	returns: ResultShape::ITEMS_AND_CONTEXT,
};
/// `players.setLanguage`: the languages the player speaks.
pub const SET_LANGUAGE: CallDescriptor = CallDescriptor {
	name: "players.setLanguage",
	parameters: &[ParamSpec::compulsory("languages")],
	access: AccessRequirements::USER,
	returns: ResultShape::CONTEXT,
};

static DESCRIPTORS: [CallDescriptor; 9] = [
	GET_CHARACTER_LEVELS,
	GET_CHARACTERS,
	GET_CLANS,
	GET_COLLECTION_PAGE,
	GET_PLAYER,
	GET_TIPS,
	SEND_GUILD_MSG,
	GET_FEED,
	SET_LANGUAGE,
];
static INDEX: LazyLock<HashMap<&'static str, &'static CallDescriptor>> =
	LazyLock::new(|| DESCRIPTORS.iter().map(|descriptor| (descriptor.name, descriptor)).collect());

/// Every known descriptor, sorted by call name.
pub fn all() -> &'static [CallDescriptor] {
	&DESCRIPTORS
}

/// Descriptor for `name`, if known.
pub fn lookup(name: &str) -> Option<&'static CallDescriptor> {
	INDEX.get(name).copied()
}
