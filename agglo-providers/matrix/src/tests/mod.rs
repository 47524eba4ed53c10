mod parse;
mod provider;
