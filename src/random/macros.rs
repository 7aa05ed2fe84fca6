/// Use this to define a unique type which will be used as a key to retrieve
/// an independent rng stream when calling `RandomStreams::stream`.
///
/// The name of the type is hashed into the seed of the stream, so two ids with
/// different names never share a sequence.
#[macro_export]
macro_rules! define_rng {
    ($vis:vis $random_id:ident) => {
        #[derive(Copy, Clone, Debug)]
        $vis struct $random_id;

        impl $crate::random::RngId for $random_id {
            type RngType = $crate::rand::rngs::SmallRng;

            fn get_name() -> &'static str {
                stringify!($random_id)
            }
        }
    };
}
