mod bitset;
mod rules;
