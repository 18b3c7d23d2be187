mod test_chain_properties;
