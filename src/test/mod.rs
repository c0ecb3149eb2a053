mod dispatcher;
mod enumeration;
mod static_inputs;
